//! Keyboard command surface driving the navigator.

/// Variations reachable through the digit shortcuts.
pub const QUICK_VARIATIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Previous,
    Next,
    Start,
    End,
    MainLine,
    /// Jump to the variation with this ordinal.
    Variation(usize),
    /// Drop the game and every line, back to an empty board.
    Reset,
    Rotate,
}

impl Command {
    /// Map a key name (DOM `KeyboardEvent.key` spelling) to a command.
    pub fn from_key(key: &str) -> Option<Self> {
        let command = match key {
            "ArrowLeft" => Command::Previous,
            "ArrowRight" => Command::Next,
            "ArrowDown" | "Home" => Command::Start,
            "ArrowUp" | "End" => Command::End,
            "m" | "M" => Command::MainLine,
            "r" | "R" => Command::Rotate,
            "Escape" => Command::Reset,
            digit => {
                let n: usize = digit.parse().ok()?;
                if !(1..=QUICK_VARIATIONS).contains(&n) {
                    return None;
                }
                Command::Variation(n - 1)
            }
        };
        Some(command)
    }

    /// Shortcut help line for the front end.
    pub fn help() -> &'static str {
        "← Previous | → Next | ↓ Start | ↑ End | R Rotate | Esc Reset | M Main Line | 1-3 Variations"
    }
}
