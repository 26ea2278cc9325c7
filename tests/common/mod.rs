#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chess_core::GameRecord;

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", std::process::id(), ts % 1_000_000_000)
}

/// Fresh directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", unique_suffix()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn sans(moves: &[&str]) -> Vec<String> {
    moves.iter().map(|m| m.to_string()).collect()
}

pub fn record(id: &str, white: &str, black: &str, pgn: &str) -> GameRecord {
    GameRecord {
        id: id.to_string(),
        white: white.to_string(),
        black: black.to_string(),
        result: "*".to_string(),
        date: "2024-05-04".to_string(),
        eco: None,
        pgn: pgn.to_string(),
        time_control: Some("3+2".to_string()),
        event: Some("Casual".to_string()),
    }
}

/// A short Ruy Lopez with headers, as Lichess exports it.
pub const RUY_LOPEZ: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/abcd1234"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[ECO "C60"]

1. e4 { [%clk 0:03:00] } e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 1-0"#;
