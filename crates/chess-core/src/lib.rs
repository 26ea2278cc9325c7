//! Chess primitives shared by the viewer: the game record model, PGN
//! decoding, and the rules engine the board navigator replays through.

pub mod game_data;
pub mod pgn;
pub mod rules;

pub use game_data::GameRecord;
pub use rules::{RulesEngine, RulesError, ShakmatyRules};
