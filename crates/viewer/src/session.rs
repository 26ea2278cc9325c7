//! One viewing session: the navigator plus what the front end shows around
//! it (selected game, orientation, move list).

use std::cell::RefCell;
use std::rc::Rc;

use board_navigator::{Command, MoveOutcome, Navigator, Orientation, VariationMode};
use chess_core::{GameRecord, ShakmatyRules};
use shakmaty::{Color, File, Position, Rank, Square};

use crate::config::Config;
use crate::error::AppError;
use crate::move_list::{click_target, highlighted_ply, MoveListState, MoveListSync};

pub struct ViewerSession {
    navigator: Navigator,
    record: Option<GameRecord>,
    username: Option<String>,
    orientation: Orientation,
    move_list: Rc<RefCell<MoveListState>>,
}

impl ViewerSession {
    pub fn new(mode: VariationMode, username: Option<String>) -> Self {
        let mut navigator = Navigator::new(ShakmatyRules, mode);
        let (sync, move_list) = MoveListSync::new();
        navigator.add_observer(Box::new(sync));

        Self {
            navigator,
            record: None,
            username,
            orientation: Orientation::default(),
            move_list,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.variation_mode, config.username.clone())
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn record(&self) -> Option<&GameRecord> {
        self.record.as_ref()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Show `record` from its first position, oriented for the configured
    /// user. Undecodable notation still selects the game (on an empty
    /// board) and is returned as an error.
    pub fn select_game(&mut self, record: GameRecord) -> Result<(), AppError> {
        self.orientation = Orientation::for_game(&record, self.username.as_deref());
        let loaded = self.navigator.load_game(&record);
        self.record = Some(record);
        loaded.map_err(AppError::from)
    }

    /// Drop the selected game and return to a freeform board.
    pub fn clear_game(&mut self) {
        self.record = None;
        self.navigator.reset();
    }

    /// Run a keyboard command. Returns whether anything changed.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Previous => self.navigator.previous(),
            Command::Next => self.navigator.next(),
            Command::Start => self.navigator.start(),
            Command::End => self.navigator.end(),
            Command::MainLine => self.navigator.to_main_line(),
            Command::Variation(ordinal) => self.navigator.to_variation(ordinal),
            Command::Reset => {
                self.clear_game();
                true
            }
            Command::Rotate => {
                self.orientation = self.orientation.flipped();
                true
            }
        }
    }

    /// Play a move typed as coordinates (`e2e4`, `e7e8q`) or SAN (`Nf3`).
    pub fn play(&mut self, input: &str) -> Result<MoveOutcome, AppError> {
        let input = input.trim();
        let outcome = match parse_coordinates(input) {
            Some((from, to, promotion)) => self.navigator.apply_move(from, to, promotion)?,
            None => self.navigator.apply_san(input)?,
        };
        Ok(outcome)
    }

    /// Jump to the position after main-line ply `ply_index`, as a click on
    /// the move list does.
    pub fn click_ply(&mut self, ply_index: usize) -> bool {
        self.navigator.go_to(click_target(ply_index), None)
    }

    /// `Move k of n`, where `n` is the length of the track being viewed.
    pub fn status_line(&self) -> String {
        let cursor = self.navigator.cursor();
        let mut line = format!(
            "Move {} of {}",
            cursor.absolute_index,
            self.navigator.track_end()
        );
        if let Some(ordinal) = cursor.variation {
            line.push_str(&format!(" (Variation {})", ordinal + 1));
        }
        line
    }

    /// Status line plus a marker when there is nowhere further to step.
    pub fn status_with_bounds(&self) -> String {
        let mut line = self.status_line();
        if self.navigator.at_start() {
            line.push_str(" [start]");
        } else if self.navigator.at_end() {
            line.push_str(" [end]");
        }
        line
    }

    /// Move list lines for the record's moves, or the freeform history.
    /// No main-line ply is marked while a variation is shown.
    pub fn move_list_lines(&self) -> Vec<String> {
        let state = self.move_list.borrow();
        let current = match self.navigator.cursor().variation {
            Some(_) => None,
            None => highlighted_ply(state.cursor),
        };
        if self.record.is_some() {
            state.render_with(self.navigator.main_line(), current)
        } else {
            state.render_with(&state.history, current)
        }
    }

    /// Text diagram of the current position, bottom side nearest the
    /// viewer. White pieces are upper case, empty squares `.`.
    pub fn render_board(&self) -> String {
        let board = self.navigator.position().board();
        let flipped = self.orientation.bottom() == Color::Black;

        let ranks: Vec<Rank> = if flipped {
            Rank::ALL.to_vec()
        } else {
            Rank::ALL.iter().rev().copied().collect()
        };
        let files: Vec<File> = if flipped {
            File::ALL.iter().rev().copied().collect()
        } else {
            File::ALL.to_vec()
        };

        let mut out = String::new();
        for rank in &ranks {
            out.push(rank.char());
            out.push(' ');
            for (i, file) in files.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let square = Square::from_coords(*file, *rank);
                out.push(board.piece_at(square).map_or('.', |piece| piece.char()));
            }
            out.push('\n');
        }
        out.push_str("  ");
        let labels: Vec<String> = files.iter().map(|f| f.char().to_string()).collect();
        out.push_str(&labels.join(" "));
        out.push('\n');
        out
    }
}

/// `e2e4` / `e7e8q` split into squares and promotion letter.
fn parse_coordinates(input: &str) -> Option<(&str, &str, Option<char>)> {
    if !input.is_ascii() || !(4..=5).contains(&input.len()) {
        return None;
    }
    let (from, to) = (&input[0..2], &input[2..4]);
    Square::from_ascii(from.as_bytes()).ok()?;
    Square::from_ascii(to.as_bytes()).ok()?;
    let promotion = match input[4..].chars().next() {
        Some(c) if "qrbnQRBN".contains(c) => Some(c),
        Some(_) => return None,
        None => None,
    };
    Some((from, to, promotion))
}
