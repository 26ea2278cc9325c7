//! Move/variation navigation over a chess game.
//!
//! The [`Navigator`] owns a main line, user-created variations and a cursor,
//! and derives the board position by replaying through a
//! [`chess_core::RulesEngine`]. Views subscribe through
//! [`NavigatorObserver`]; keyboard input maps onto [`Command`].

pub mod error;
pub mod keys;
pub mod navigator;
pub mod observer;
pub mod orientation;
pub mod variation;

pub use error::NavigatorError;
pub use keys::Command;
pub use navigator::{MoveOutcome, Navigator};
pub use observer::NavigatorObserver;
pub use orientation::Orientation;
pub use variation::{Cursor, Variation, VariationMode};
