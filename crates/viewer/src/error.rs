use board_navigator::NavigatorError;

use crate::clients::lichess::LichessError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),

    #[error(transparent)]
    Lichess(#[from] LichessError),

    #[error(transparent)]
    Navigator(#[from] NavigatorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
