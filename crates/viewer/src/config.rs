//! Viewer configuration from environment variables (`.env` is loaded by the
//! binaries before this runs).

use std::env;
use std::path::PathBuf;

use board_navigator::VariationMode;

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "https://lichess.org/api";

#[derive(Clone, Debug)]
pub struct Config {
    /// Lichess API root, overridable for tests and mirrors.
    pub lichess_api_base: String,

    /// Personal access token; enables `/account` and private games.
    pub lichess_token: Option<String>,

    /// Whose games to import. Also decides board orientation.
    pub username: Option<String>,

    pub max_games: usize,

    /// Directory holding the NDJSON game library.
    pub games_dir: PathBuf,

    pub http_timeout_secs: u64,

    pub variation_mode: VariationMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lichess_api_base: DEFAULT_API_BASE.to_string(),
            lichess_token: None,
            username: None,
            max_games: 200,
            games_dir: PathBuf::from("data"),
            http_timeout_secs: 30,
            variation_mode: VariationMode::Branching,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let variation_mode = match non_empty("VARIATIONS") {
            Some(value) => value.parse::<VariationMode>().map_err(AppError::Config)?,
            None => defaults.variation_mode,
        };

        Ok(Self {
            lichess_api_base: non_empty("LICHESS_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.lichess_api_base),
            lichess_token: non_empty("LICHESS_TOKEN"),
            username: non_empty("LICHESS_USERNAME"),
            max_games: non_empty("MAX_GAMES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_games),
            games_dir: non_empty("GAMES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.games_dir),
            http_timeout_secs: non_empty("HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            variation_mode,
        })
    }
}
