//! Numbered move list with inline variations, kept in step with a navigator.

use std::cell::RefCell;
use std::rc::Rc;

use board_navigator::{NavigatorObserver, Variation};

/// A full move: white's ply and, unless the line ends, black's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePair {
    pub number: usize,
    pub white: String,
    pub black: Option<String>,
    pub white_index: usize,
    pub black_index: usize,
}

pub fn move_pairs(moves: &[String]) -> Vec<MovePair> {
    moves
        .chunks(2)
        .enumerate()
        .map(|(i, chunk)| MovePair {
            number: i + 1,
            white: chunk[0].clone(),
            black: chunk.get(1).cloned(),
            white_index: i * 2,
            black_index: i * 2 + 1,
        })
        .collect()
}

/// Variations branching at either ply of `pair`, with their ordinals.
pub fn variations_at<'a>(pair: &MovePair, variations: &'a [Variation]) -> Vec<(usize, &'a Variation)> {
    variations
        .iter()
        .enumerate()
        .filter(|(_, v)| v.anchor_index == pair.white_index || v.anchor_index == pair.black_index)
        .collect()
}

pub fn format_variation(variation: &Variation) -> String {
    format!("({})", variation.moves.join(" "))
}

/// Ply index that produced the position at `cursor`; nothing at the start.
pub fn highlighted_ply(cursor: usize) -> Option<usize> {
    cursor.checked_sub(1)
}

/// Cursor index that shows the position after ply `ply_index`.
pub fn click_target(ply_index: usize) -> usize {
    ply_index + 1
}

/// Latest navigator state as seen by the move list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveListState {
    pub cursor: usize,
    pub variations: Vec<Variation>,
    /// Main line of a freeform session; empty while a record is shown.
    pub history: Vec<String>,
}

impl MoveListState {
    /// Text lines for `moves`, marking the current ply as `[Nf3]` and
    /// listing variations under the pair they branch from.
    pub fn render(&self, moves: &[String]) -> Vec<String> {
        self.render_with(moves, highlighted_ply(self.cursor))
    }

    /// As `render`, with the marked ply chosen by the caller.
    pub fn render_with(&self, moves: &[String], current: Option<usize>) -> Vec<String> {
        if moves.is_empty() && self.variations.is_empty() {
            return vec!["No moves to display.".to_string()];
        }

        let mark = |san: &str, index: usize| {
            if current == Some(index) {
                format!("[{san}]")
            } else {
                san.to_string()
            }
        };

        let mut lines = Vec::new();
        for pair in move_pairs(moves) {
            let mut line = format!("{}. {}", pair.number, mark(&pair.white, pair.white_index));
            if let Some(black) = &pair.black {
                line.push(' ');
                line.push_str(&mark(black, pair.black_index));
            }
            lines.push(line);

            for (ordinal, variation) in variations_at(&pair, &self.variations) {
                lines.push(format!("   {}: {}", ordinal + 1, format_variation(variation)));
            }
        }

        // Variations anchored past the last recorded ply.
        let past_end = moves.len() + moves.len() % 2;
        for (ordinal, variation) in self.variations.iter().enumerate() {
            if variation.anchor_index >= past_end {
                lines.push(format!("   {}: {}", ordinal + 1, format_variation(variation)));
            }
        }

        lines
    }
}

/// Observer mirroring navigator changes into a shared `MoveListState`.
pub struct MoveListSync {
    state: Rc<RefCell<MoveListState>>,
}

impl MoveListSync {
    /// The observer and a handle for reading what it has seen.
    pub fn new() -> (Self, Rc<RefCell<MoveListState>>) {
        let state = Rc::new(RefCell::new(MoveListState::default()));
        (
            Self {
                state: Rc::clone(&state),
            },
            state,
        )
    }
}

impl NavigatorObserver for MoveListSync {
    fn on_cursor_change(&mut self, absolute_index: usize) {
        self.state.borrow_mut().cursor = absolute_index;
    }

    fn on_variations_change(&mut self, variations: &[Variation]) {
        self.state.borrow_mut().variations = variations.to_vec();
    }

    fn on_history_change(&mut self, main_line: &[String]) {
        self.state.borrow_mut().history = main_line.to_vec();
    }
}
