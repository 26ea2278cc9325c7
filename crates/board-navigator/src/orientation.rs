use chess_core::GameRecord;
use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// Which side sits at the bottom of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    /// Orientation for `viewer` looking at `record`: their own side at the
    /// bottom, white when they did not play or no viewer is configured.
    pub fn for_game(record: &GameRecord, viewer: Option<&str>) -> Self {
        match viewer.and_then(|name| record.side_of(name)) {
            Some(Color::Black) => Orientation::Black,
            _ => Orientation::White,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }

    /// Side whose back rank is drawn last, nearest the viewer.
    pub fn bottom(self) -> Color {
        match self {
            Orientation::White => Color::White,
            Orientation::Black => Color::Black,
        }
    }
}
