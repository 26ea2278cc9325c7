//! Terminal chess game viewer: Lichess import, a local game library, and a
//! session wrapping the board navigator.

pub mod clients;
pub mod config;
pub mod error;
pub mod library;
pub mod move_list;
pub mod session;

pub use config::Config;
pub use error::AppError;
pub use library::GameLibrary;
pub use session::ViewerSession;
