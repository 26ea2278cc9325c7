//! Rules engine seam.
//!
//! The board navigator never touches chess rules directly; it goes through
//! [`RulesEngine`] so positions are always derived by replaying notation.
//! [`ShakmatyRules`] is the production implementation.

use shakmaty::{
    fen::Fen,
    san::SanPlus,
    uci::UciMove,
    Chess, EnPassantMode, Position, Rank, Role, Square,
};

use crate::pgn::{self, PgnError};

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("Invalid square '{0}'")]
    InvalidSquare(String),

    #[error("Invalid promotion piece '{0}'")]
    InvalidPromotion(char),

    #[error("Not a legal move in the current position: {0}")]
    IllegalMove(String),

    #[error("Cannot replay move '{san}' at ply {ply}")]
    Replay { san: String, ply: usize },

    #[error(transparent)]
    Notation(#[from] PgnError),
}

/// Deterministic, side-effect-free chess rules.
pub trait RulesEngine {
    /// Whatever the engine needs to validate the next move.
    type Position: Clone;

    /// The position before any move.
    fn initial_position(&self) -> Self::Position;

    /// Play `moves` from the initial position.
    fn replay(&self, moves: &[String]) -> Result<Self::Position, RulesError>;

    /// Validate a from/to move (board drag) and return its notation.
    /// `promotion` is only consulted when a pawn reaches the last rank.
    fn try_move(
        &self,
        position: &Self::Position,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> Result<String, RulesError>;

    /// Validate a typed notation move and return it in canonical form.
    fn try_san(&self, position: &Self::Position, san: &str) -> Result<String, RulesError>;

    /// Decode the mainline of a portable game notation text.
    fn decode(&self, notation: &str) -> Result<Vec<String>, RulesError>;

    /// Position identifier (FEN for standard chess).
    fn position_id(&self, position: &Self::Position) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    fn parse_square(square: &str) -> Result<Square, RulesError> {
        Square::from_ascii(square.trim().as_bytes())
            .map_err(|_| RulesError::InvalidSquare(square.to_string()))
    }
}

impl RulesEngine for ShakmatyRules {
    type Position = Chess;

    fn initial_position(&self) -> Chess {
        Chess::default()
    }

    fn replay(&self, moves: &[String]) -> Result<Chess, RulesError> {
        let mut pos = Chess::default();

        for (i, san_str) in moves.iter().enumerate() {
            let replay_err = || RulesError::Replay {
                san: san_str.clone(),
                ply: i + 1,
            };
            let san: SanPlus = san_str.parse().map_err(|_| replay_err())?;
            let mv = san.san.to_move(&pos).map_err(|_| replay_err())?;
            pos.play_unchecked(mv);
        }

        Ok(pos)
    }

    fn try_move(
        &self,
        position: &Chess,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> Result<String, RulesError> {
        let from_sq = Self::parse_square(from)?;
        let to_sq = Self::parse_square(to)?;

        let is_pawn = position.board().role_at(from_sq) == Some(Role::Pawn);
        let last_rank = position.turn().fold_wb(Rank::Eighth, Rank::First);
        let promotion = if is_pawn && to_sq.rank() == last_rank {
            // Board drags never ask; default to a queen like most GUIs.
            let ch = promotion.unwrap_or('q');
            Some(
                Role::from_char(ch.to_ascii_lowercase())
                    .filter(|role| !matches!(role, Role::Pawn | Role::King))
                    .ok_or(RulesError::InvalidPromotion(ch))?,
            )
        } else {
            None
        };

        let uci = UciMove::Normal {
            from: from_sq,
            to: to_sq,
            promotion,
        };
        let mv = uci
            .to_move(position)
            .map_err(|_| RulesError::IllegalMove(uci.to_string()))?;

        let mut after = position.clone();
        Ok(SanPlus::from_move_and_play_unchecked(&mut after, mv).to_string())
    }

    fn try_san(&self, position: &Chess, san: &str) -> Result<String, RulesError> {
        let parsed: SanPlus = san
            .trim()
            .parse()
            .map_err(|_| RulesError::IllegalMove(san.to_string()))?;
        let mv = parsed
            .san
            .to_move(position)
            .map_err(|_| RulesError::IllegalMove(san.to_string()))?;

        let mut after = position.clone();
        Ok(SanPlus::from_move_and_play_unchecked(&mut after, mv).to_string())
    }

    fn decode(&self, notation: &str) -> Result<Vec<String>, RulesError> {
        Ok(pgn::decode_moves(notation)?)
    }

    fn position_id(&self, position: &Chess) -> String {
        Fen::from_position(position, EnPassantMode::Legal).to_string()
    }
}
