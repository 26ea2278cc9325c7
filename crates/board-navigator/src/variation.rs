use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A side line branching off the main line.
///
/// `anchor_index` is the main-line index the line starts from: the
/// variation's first move is an alternative to (or an extension past)
/// `main_line[anchor_index]`. Local index `j` inside the variation is
/// reported as absolute index `anchor_index + j`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    pub anchor_index: usize,
    pub moves: Vec<String>,
}

impl Variation {
    pub fn new(anchor_index: usize, first_move: String) -> Self {
        Self {
            anchor_index,
            moves: vec![first_move],
        }
    }

    /// Absolute index of the variation's last position.
    pub fn end_index(&self) -> usize {
        self.anchor_index + self.moves.len()
    }

    /// Local offset for an absolute index, if it lies on this variation.
    pub fn local_index(&self, absolute_index: usize) -> Option<usize> {
        absolute_index
            .checked_sub(self.anchor_index)
            .filter(|local| *local <= self.moves.len())
    }
}

/// Where the board currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub absolute_index: usize,
    /// Ordinal of the active variation; `None` on the main line.
    pub variation: Option<usize>,
}

impl Cursor {
    pub fn main_line(absolute_index: usize) -> Self {
        Self {
            absolute_index,
            variation: None,
        }
    }

    pub fn in_variation(absolute_index: usize, ordinal: usize) -> Self {
        Self {
            absolute_index,
            variation: Some(ordinal),
        }
    }
}

/// Whether deviating from the main line opens side lines or is refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationMode {
    #[default]
    Branching,
    MainLineOnly,
}

impl VariationMode {
    pub fn allows_branching(self) -> bool {
        matches!(self, VariationMode::Branching)
    }
}

impl FromStr for VariationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" | "true" | "branching" => Ok(VariationMode::Branching),
            "off" | "false" | "main_line_only" => Ok(VariationMode::MainLineOnly),
            other => Err(format!("unknown variation mode '{other}'")),
        }
    }
}
