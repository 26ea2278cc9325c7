use std::time::Duration;

use chess_core::GameRecord;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum LichessError {
    #[error("User \"{0}\" not found on Lichess")]
    UserNotFound(String),

    #[error("Rate limit exceeded. Please wait before trying again.")]
    RateLimited,

    #[error("Access denied. User may have private games.")]
    AccessDenied,

    #[error("Invalid request parameters")]
    InvalidRequest,

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("No access token configured")]
    MissingToken,

    #[error("Invalid Lichess username: {0:?}")]
    InvalidUsername(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

/// Public profile as returned by `/user/{name}` and `/account`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LichessUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub online: bool,
}

const MAX_USERNAME_LEN: usize = 30;

/// Lichess usernames are ASCII letters, digits, `_` and `-`, at most 30
/// long. Anything else never reaches a URL or a file name.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn check_username(username: &str) -> Result<(), LichessError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(LichessError::InvalidUsername(username.to_string()))
    }
}

pub struct LichessClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LichessClient {
    pub fn new(config: &Config) -> Result<Self, LichessError> {
        let client = Client::builder()
            .user_agent("ChessViewer/1.0")
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.lichess_api_base.clone(),
            token: config.lichess_token.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Fetch up to `max_games` of a user's games, newest first.
    pub async fn fetch_user_games(
        &self,
        username: &str,
        max_games: usize,
    ) -> Result<Vec<GameRecord>, LichessError> {
        check_username(username)?;
        let url = format!("{}/games/user/{}", self.base_url, username);
        let params = [
            ("max", max_games.to_string()),
            ("pgnInJson", "true".to_string()),
            ("sort", "dateDesc".to_string()),
            ("opening", "true".to_string()),
        ];

        tracing::info!(username, max_games, "Fetching games from Lichess");

        let request = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson");
        let resp = self.authorized(request).send().await?;
        check_status(resp.status(), username)?;

        let text = resp.text().await?;
        let games = parse_ndjson(&text);
        tracing::info!(username, count = games.len(), "Fetched games from Lichess");
        Ok(games)
    }

    /// The account the configured token belongs to.
    pub async fn fetch_account(&self) -> Result<LichessUser, LichessError> {
        let token = self.token.as_deref().ok_or(LichessError::MissingToken)?;
        let resp = self
            .client
            .get(format!("{}/account", self.base_url))
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;
        check_status(resp.status(), "account")?;
        Ok(resp.json().await?)
    }

    /// Look up a public profile; `None` if the user doesn't exist.
    pub async fn validate_user(&self, username: &str) -> Result<Option<LichessUser>, LichessError> {
        check_username(username)?;
        let resp = self
            .client
            .get(format!("{}/user/{}", self.base_url, username))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(resp.status(), username)?;
        Ok(Some(resp.json().await?))
    }
}

fn check_status(status: StatusCode, username: &str) -> Result<(), LichessError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::NOT_FOUND => LichessError::UserNotFound(username.to_string()),
        StatusCode::TOO_MANY_REQUESTS => LichessError::RateLimited,
        StatusCode::FORBIDDEN => LichessError::AccessDenied,
        StatusCode::BAD_REQUEST => LichessError::InvalidRequest,
        other => LichessError::Status(other),
    })
}

/// Parse an NDJSON export body. Unreadable lines and games without PGN are
/// skipped.
pub fn parse_ndjson(text: &str) -> Vec<GameRecord> {
    let mut results = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(game_data) => {
                if let Some(record) = game_record(&game_data) {
                    results.push(record);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse Lichess game JSON: {e}");
            }
        }
    }

    results
}

/// Map one exported game onto a record.
pub fn game_record(game: &Value) -> Option<GameRecord> {
    let pgn = game.get("pgn").and_then(Value::as_str).filter(|p| !p.is_empty())?;
    let id = game.get("id").and_then(Value::as_str).unwrap_or("").to_string();

    Some(GameRecord {
        id,
        white: player_name(game, "white"),
        black: player_name(game, "black"),
        result: format_result(
            game.get("status").and_then(Value::as_str).unwrap_or(""),
            game.get("winner").and_then(Value::as_str),
        )
        .to_string(),
        date: game
            .get("createdAt")
            .and_then(Value::as_i64)
            .map(format_date)
            .unwrap_or_default(),
        eco: game
            .pointer("/opening/eco")
            .and_then(Value::as_str)
            .map(str::to_string),
        pgn: pgn.to_string(),
        time_control: Some(format_time_control(
            game.get("clock"),
            game.get("daysPerTurn").and_then(Value::as_u64),
        )),
        event: Some(
            game.pointer("/tournament/name")
                .or_else(|| game.get("source"))
                .and_then(Value::as_str)
                .unwrap_or("Casual")
                .to_string(),
        ),
    })
}

fn player_name(game: &Value, color: &str) -> String {
    let player = game.pointer(&format!("/players/{color}"));
    player
        .and_then(|p| p.pointer("/user/name"))
        .or_else(|| player.and_then(|p| p.get("name")))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or("Anonymous")
        .to_string()
}

pub fn format_result(status: &str, winner: Option<&str>) -> &'static str {
    match status {
        "mate" | "resign" | "timeout" => {
            if winner == Some("white") {
                "1-0"
            } else {
                "0-1"
            }
        }
        "draw" | "stalemate" => "1/2-1/2",
        _ => "*",
    }
}

pub fn format_time_control(clock: Option<&Value>, days_per_turn: Option<u64>) -> String {
    if let Some(clock) = clock.filter(|c| c.is_object()) {
        let initial = clock.get("initial").and_then(Value::as_u64).unwrap_or(0);
        let increment = clock.get("increment").and_then(Value::as_u64).unwrap_or(0);
        return format!("{}+{}", initial / 60, increment);
    }
    match days_per_turn {
        Some(days) if days > 0 => format!("{days} days/move"),
        _ => "Unknown".to_string(),
    }
}

/// `createdAt` epoch milliseconds as `YYYY-MM-DD` (UTC).
pub fn format_date(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
