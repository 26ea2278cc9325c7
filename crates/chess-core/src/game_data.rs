use serde::{Deserialize, Serialize};

/// One historical game as handed to the viewer by an import source.
///
/// Only `pgn` feeds the board; everything else is display data and passes
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eco: Option<String>,
    pub pgn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

impl GameRecord {
    /// Which side `username` played, compared case-insensitively.
    /// `None` when the user is not one of the two players.
    pub fn side_of(&self, username: &str) -> Option<shakmaty::Color> {
        let username = username.to_lowercase();
        if self.white.to_lowercase() == username {
            Some(shakmaty::Color::White)
        } else if self.black.to_lowercase() == username {
            Some(shakmaty::Color::Black)
        } else {
            None
        }
    }

    /// Short one-line label for game lists.
    pub fn title(&self) -> String {
        format!("{} vs {} ({}, {})", self.white, self.black, self.result, self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GameRecord {
        GameRecord {
            id: "abc123".to_string(),
            white: "Magnus".to_string(),
            black: "hikaru".to_string(),
            result: "1-0".to_string(),
            date: "2024-03-01".to_string(),
            eco: Some("C20".to_string()),
            pgn: "1. e4 e5 1-0".to_string(),
            time_control: Some("3+2".to_string()),
            event: None,
        }
    }

    #[test]
    fn test_side_of_ignores_case() {
        let game = record();
        assert_eq!(game.side_of("magnus"), Some(shakmaty::Color::White));
        assert_eq!(game.side_of("HIKARU"), Some(shakmaty::Color::Black));
        assert_eq!(game.side_of("someone"), None);
    }

    #[test]
    fn test_serde_uses_camel_case_and_skips_missing() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["timeControl"], "3+2");
        assert!(json.get("event").is_none());

        let back: GameRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record());
    }
}
