//! Hooks for views that mirror the navigator (move list, counters).

use crate::variation::Variation;

/// Receives navigator state changes. Every method defaults to a no-op so
/// implementors only override what they display.
pub trait NavigatorObserver {
    /// The cursor moved to `absolute_index`.
    fn on_cursor_change(&mut self, absolute_index: usize) {
        let _ = absolute_index;
    }

    /// The full variation list after a change.
    fn on_variations_change(&mut self, variations: &[Variation]) {
        let _ = variations;
    }

    /// The main line after a change. Only sent while no game record is
    /// loaded; a record's history never changes.
    fn on_history_change(&mut self, main_line: &[String]) {
        let _ = main_line;
    }
}
