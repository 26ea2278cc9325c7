//! Move/variation navigator.
//!
//! Tracks a main line plus any number of user-created side lines and a cursor
//! into one of them. The board position is never edited in place: every
//! cursor change replays the relevant move prefix through the rules engine,
//! so the position can't drift from `(main line, variations, cursor)`.
//!
//! Lines are append-only. Playing a move either follows the line the cursor
//! is on, extends it, or opens a new variation; nothing already recorded is
//! rewritten or removed until the whole session is reset.

use chess_core::{GameRecord, RulesEngine, ShakmatyRules};
use tracing::{debug, info, warn};

use crate::error::NavigatorError;
use crate::observer::NavigatorObserver;
use crate::variation::{Cursor, Variation, VariationMode};

/// How an accepted move was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move matched the next main-line move; the cursor just advanced.
    FollowedMainLine,
    /// Appended to the main line (freeform session only).
    ExtendedMainLine,
    /// The move matched the next move of the active variation.
    FollowedVariation(usize),
    /// Appended to the end of the active variation.
    ExtendedVariation(usize),
    /// A new variation was opened; holds its ordinal.
    NewVariation(usize),
}

impl MoveOutcome {
    fn variation(self) -> Option<usize> {
        match self {
            MoveOutcome::FollowedMainLine | MoveOutcome::ExtendedMainLine => None,
            MoveOutcome::FollowedVariation(ordinal)
            | MoveOutcome::ExtendedVariation(ordinal)
            | MoveOutcome::NewVariation(ordinal) => Some(ordinal),
        }
    }
}

pub struct Navigator<R: RulesEngine = ShakmatyRules> {
    rules: R,
    mode: VariationMode,
    main_line: Vec<String>,
    variations: Vec<Variation>,
    cursor: Cursor,
    /// Display cache, always the replay of the line under `cursor`.
    position: R::Position,
    /// A loaded record's main line is history and never grows.
    has_record: bool,
    observers: Vec<Box<dyn NavigatorObserver>>,
}

impl Navigator<ShakmatyRules> {
    /// Freeform navigator over standard chess with variations enabled.
    pub fn standard() -> Self {
        Self::new(ShakmatyRules, VariationMode::Branching)
    }
}

impl<R: RulesEngine> Navigator<R> {
    pub fn new(rules: R, mode: VariationMode) -> Self {
        let position = rules.initial_position();
        Self {
            rules,
            mode,
            main_line: Vec::new(),
            variations: Vec::new(),
            cursor: Cursor::default(),
            position,
            has_record: false,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn NavigatorObserver>) {
        self.observers.push(observer);
    }

    pub fn mode(&self) -> VariationMode {
        self.mode
    }

    pub fn main_line(&self) -> &[String] {
        &self.main_line
    }

    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn position(&self) -> &R::Position {
        &self.position
    }

    pub fn position_id(&self) -> String {
        self.rules.position_id(&self.position)
    }

    pub fn has_record(&self) -> bool {
        self.has_record
    }

    /// The variation the cursor is in, with its ordinal.
    pub fn active_variation(&self) -> Option<(usize, &Variation)> {
        let ordinal = self.cursor.variation?;
        self.variations.get(ordinal).map(|v| (ordinal, v))
    }

    /// Last absolute index of the track the cursor is on.
    pub fn track_end(&self) -> usize {
        match self.active_variation() {
            Some((_, variation)) => variation.end_index(),
            None => self.main_line.len(),
        }
    }

    pub fn at_start(&self) -> bool {
        self.cursor.absolute_index == 0
    }

    pub fn at_end(&self) -> bool {
        self.cursor.absolute_index >= self.track_end()
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Show `record` from its initial position, discarding all variations.
    ///
    /// Undecodable notation leaves an empty main line (the record stays
    /// selected) and returns the decode error.
    pub fn load_game(&mut self, record: &GameRecord) -> Result<(), NavigatorError> {
        let decoded = self.rules.decode(&record.pgn);
        let (main_line, result) = match decoded {
            Ok(moves) => {
                info!(game_id = %record.id, plies = moves.len(), "Loaded game");
                (moves, Ok(()))
            }
            Err(e) => {
                warn!(game_id = %record.id, "Failed to decode game notation: {e}");
                (Vec::new(), Err(NavigatorError::MalformedNotation(e)))
            }
        };

        self.replace_session(main_line, true);
        result
    }

    /// Clear everything and return to a freeform board.
    pub fn reset(&mut self) {
        debug!("Resetting navigator");
        self.replace_session(Vec::new(), false);
    }

    fn replace_session(&mut self, main_line: Vec<String>, has_record: bool) {
        self.main_line = main_line;
        self.variations.clear();
        self.has_record = has_record;
        self.cursor = Cursor::default();
        self.position = self.rules.initial_position();

        self.notify_cursor();
        self.notify_variations();
        if !self.has_record {
            self.notify_history();
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move the cursor to `absolute_index`, inside variation `variation`
    /// when given and in range, otherwise on the main line.
    ///
    /// Out-of-range requests are ignored and return `false`.
    pub fn go_to(&mut self, absolute_index: usize, variation: Option<usize>) -> bool {
        let Some((line, variation)) = self.line_to(absolute_index, variation) else {
            debug!(absolute_index, ?variation, "Ignoring out-of-range navigation");
            return false;
        };

        match self.rules.replay(&line) {
            Ok(position) => {
                self.publish(Cursor { absolute_index, variation }, position);
                true
            }
            Err(e) => {
                warn!(absolute_index, ?variation, "Replay failed, keeping position: {e}");
                false
            }
        }
    }

    pub fn start(&mut self) -> bool {
        self.go_to(0, None)
    }

    pub fn end(&mut self) -> bool {
        match self.active_bounds() {
            Some((ordinal, _, end)) => self.go_to(end, Some(ordinal)),
            None => self.go_to(self.main_line.len(), None),
        }
    }

    /// One ply back. Stepping back onto (or past) a variation's anchor
    /// leaves the variation; the anchor position is the main line's.
    pub fn previous(&mut self) -> bool {
        let Some(target) = self.cursor.absolute_index.checked_sub(1) else {
            return false;
        };

        match self.active_bounds() {
            Some((ordinal, anchor, _)) if target > anchor => self.go_to(target, Some(ordinal)),
            Some(_) => self.go_to(target.min(self.main_line.len()), None),
            None => self.go_to(target, None),
        }
    }

    /// One ply forward on the current track; stops at a variation's end.
    pub fn next(&mut self) -> bool {
        let target = self.cursor.absolute_index + 1;
        match self.active_bounds() {
            Some((ordinal, _, end)) if target <= end => self.go_to(target, Some(ordinal)),
            Some(_) => false,
            None => self.go_to(target, None),
        }
    }

    /// Leave the active variation, keeping the ply number.
    ///
    /// This is a nearest jump, clamped to the main line's length; when the
    /// variation diverged early the main-line position can differ entirely.
    pub fn to_main_line(&mut self) -> bool {
        if self.cursor.variation.is_none() {
            return false;
        }
        let target = self.cursor.absolute_index.min(self.main_line.len());
        self.go_to(target, None)
    }

    /// Enter variation `ordinal` at its branching point.
    pub fn to_variation(&mut self, ordinal: usize) -> bool {
        match self.variations.get(ordinal).map(|v| v.anchor_index) {
            Some(anchor) => self.go_to(anchor, Some(ordinal)),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Playing moves
    // ------------------------------------------------------------------

    /// Play a from/to move (e.g. a board drag) at the cursor.
    pub fn apply_move(
        &mut self,
        from: &str,
        to: &str,
        promotion: Option<char>,
    ) -> Result<MoveOutcome, NavigatorError> {
        let san = self
            .rules
            .try_move(&self.position, from, to, promotion)
            .map_err(|e| {
                debug!(from, to, "Rejected move: {e}");
                NavigatorError::IllegalMove(e)
            })?;
        self.record(san)
    }

    /// Play a move given in notation at the cursor.
    pub fn apply_san(&mut self, san: &str) -> Result<MoveOutcome, NavigatorError> {
        let san = self.rules.try_san(&self.position, san).map_err(|e| {
            debug!(san, "Rejected move: {e}");
            NavigatorError::IllegalMove(e)
        })?;
        self.record(san)
    }

    /// Classify a validated move, append it, and advance the cursor.
    /// Nothing is mutated unless the new position replays cleanly.
    fn record(&mut self, san: String) -> Result<MoveOutcome, NavigatorError> {
        let index = self.cursor.absolute_index;
        let plan = self.plan(index, &san)?;

        let (mut line, _) = self
            .line_to(index, self.cursor.variation)
            .unwrap_or_default();
        line.push(san.clone());
        let position = self
            .rules
            .replay(&line)
            .map_err(NavigatorError::IllegalMove)?;

        let outcome = match plan {
            Plan::Follow(outcome) => outcome,
            Plan::ExtendMainLine => {
                self.main_line.push(san);
                self.notify_history();
                MoveOutcome::ExtendedMainLine
            }
            Plan::ExtendVariation(ordinal) => {
                self.variations[ordinal].moves.push(san);
                self.notify_variations();
                MoveOutcome::ExtendedVariation(ordinal)
            }
            Plan::Branch { anchor_index, mut prefix } => {
                prefix.push(san);
                self.variations.push(Variation {
                    anchor_index,
                    moves: prefix,
                });
                self.notify_variations();
                let ordinal = self.variations.len() - 1;
                info!(ordinal, anchor_index, "Opened variation");
                MoveOutcome::NewVariation(ordinal)
            }
        };

        self.publish(
            Cursor {
                absolute_index: index + 1,
                variation: outcome.variation(),
            },
            position,
        );
        Ok(outcome)
    }

    fn plan(&self, index: usize, san: &str) -> Result<Plan, NavigatorError> {
        if let Some((ordinal, variation)) = self.active_variation() {
            let local = index - variation.anchor_index;
            return match variation.moves.get(local) {
                None => Ok(Plan::ExtendVariation(ordinal)),
                Some(next) if next == san => {
                    Ok(Plan::Follow(MoveOutcome::FollowedVariation(ordinal)))
                }
                // The anchor is a main-line position; its next move stays there.
                Some(_) if local == 0 && self.main_line.get(index).is_some_and(|m| m == san) => {
                    Ok(Plan::Follow(MoveOutcome::FollowedMainLine))
                }
                // Mid-variation deviation forks a copy of the prefix.
                Some(_) => self.branch(variation.anchor_index, variation.moves[..local].to_vec()),
            };
        }

        match self.main_line.get(index) {
            Some(next) if next == san => Ok(Plan::Follow(MoveOutcome::FollowedMainLine)),
            Some(_) => self.branch(index, Vec::new()),
            None if !self.has_record => Ok(Plan::ExtendMainLine),
            // Recorded history is never extended in place.
            None => self.branch(index, Vec::new()),
        }
    }

    fn branch(&self, anchor_index: usize, prefix: Vec<String>) -> Result<Plan, NavigatorError> {
        if self.mode.allows_branching() {
            Ok(Plan::Branch {
                anchor_index,
                prefix,
            })
        } else {
            Err(NavigatorError::BranchingDisabled)
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// `(ordinal, anchor, end)` of the active variation.
    fn active_bounds(&self) -> Option<(usize, usize, usize)> {
        self.active_variation()
            .map(|(ordinal, v)| (ordinal, v.anchor_index, v.end_index()))
    }

    /// Moves to replay for a cursor target, and the variation it resolves to.
    fn line_to(
        &self,
        absolute_index: usize,
        variation: Option<usize>,
    ) -> Option<(Vec<String>, Option<usize>)> {
        if let Some(ordinal) = variation {
            if let Some(v) = self.variations.get(ordinal) {
                if let Some(local) = v.local_index(absolute_index) {
                    let mut line = self.main_line.get(..v.anchor_index)?.to_vec();
                    line.extend_from_slice(&v.moves[..local]);
                    return Some((line, Some(ordinal)));
                }
            }
        }

        let line = self.main_line.get(..absolute_index)?.to_vec();
        Some((line, None))
    }

    fn publish(&mut self, cursor: Cursor, position: R::Position) {
        self.cursor = cursor;
        self.position = position;
        self.notify_cursor();
    }

    fn notify_cursor(&mut self) {
        let index = self.cursor.absolute_index;
        for observer in &mut self.observers {
            observer.on_cursor_change(index);
        }
    }

    fn notify_variations(&mut self) {
        for observer in &mut self.observers {
            observer.on_variations_change(&self.variations);
        }
    }

    fn notify_history(&mut self) {
        for observer in &mut self.observers {
            observer.on_history_change(&self.main_line);
        }
    }
}

enum Plan {
    Follow(MoveOutcome),
    ExtendMainLine,
    ExtendVariation(usize),
    Branch {
        anchor_index: usize,
        prefix: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::RulesError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Accepts any notation except "??", so line shapes can be tested
    /// without caring whose turn it is.
    #[derive(Default)]
    struct AnyMoveRules;

    impl RulesEngine for AnyMoveRules {
        type Position = Vec<String>;

        fn initial_position(&self) -> Vec<String> {
            Vec::new()
        }

        fn replay(&self, moves: &[String]) -> Result<Vec<String>, RulesError> {
            Ok(moves.to_vec())
        }

        fn try_move(
            &self,
            _position: &Vec<String>,
            from: &str,
            to: &str,
            _promotion: Option<char>,
        ) -> Result<String, RulesError> {
            Ok(format!("{from}{to}"))
        }

        fn try_san(&self, _position: &Vec<String>, san: &str) -> Result<String, RulesError> {
            if san == "??" {
                Err(RulesError::IllegalMove(san.to_string()))
            } else {
                Ok(san.to_string())
            }
        }

        fn decode(&self, notation: &str) -> Result<Vec<String>, RulesError> {
            Ok(notation.split_whitespace().map(str::to_string).collect())
        }

        fn position_id(&self, position: &Vec<String>) -> String {
            position.join(" ")
        }
    }

    #[derive(Debug, PartialEq)]
    enum Event {
        Cursor(usize),
        Variations(usize),
        History(Vec<String>),
    }

    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl NavigatorObserver for Recorder {
        fn on_cursor_change(&mut self, absolute_index: usize) {
            self.0.borrow_mut().push(Event::Cursor(absolute_index));
        }

        fn on_variations_change(&mut self, variations: &[Variation]) {
            self.0.borrow_mut().push(Event::Variations(variations.len()));
        }

        fn on_history_change(&mut self, main_line: &[String]) {
            self.0.borrow_mut().push(Event::History(main_line.to_vec()));
        }
    }

    fn record(pgn: &str) -> GameRecord {
        GameRecord {
            id: "g1".to_string(),
            white: "w".to_string(),
            black: "b".to_string(),
            result: "*".to_string(),
            date: String::new(),
            eco: None,
            pgn: pgn.to_string(),
            time_control: None,
            event: None,
        }
    }

    fn with_game(pgn: &str) -> Navigator<AnyMoveRules> {
        let mut nav = Navigator::new(AnyMoveRules, VariationMode::Branching);
        nav.load_game(&record(pgn)).unwrap();
        nav
    }

    #[test]
    fn test_deviation_opens_variation() {
        let mut nav = with_game("e4 e5 Nf3");
        assert!(nav.go_to(1, None));

        let outcome = nav.apply_san("Nc3").unwrap();

        assert_eq!(outcome, MoveOutcome::NewVariation(0));
        assert_eq!(
            nav.variations(),
            &[Variation::new(1, "Nc3".to_string())]
        );
        assert_eq!(nav.cursor(), Cursor::in_variation(2, 0));
        assert_eq!(nav.position_id(), "e4 Nc3");
    }

    #[test]
    fn test_matching_move_follows_main_line() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);

        assert_eq!(nav.apply_san("e5").unwrap(), MoveOutcome::FollowedMainLine);
        assert_eq!(nav.cursor(), Cursor::main_line(2));
        assert!(nav.variations().is_empty());
    }

    #[test]
    fn test_freeform_moves_extend_main_line() {
        let mut nav = Navigator::new(AnyMoveRules, VariationMode::Branching);

        assert_eq!(nav.apply_san("e4").unwrap(), MoveOutcome::ExtendedMainLine);
        assert_eq!(nav.apply_san("e5").unwrap(), MoveOutcome::ExtendedMainLine);

        assert_eq!(nav.main_line(), &["e4".to_string(), "e5".to_string()]);
        assert_eq!(nav.cursor(), Cursor::main_line(2));
        assert!(nav.variations().is_empty());
    }

    #[test]
    fn test_extending_a_record_branches() {
        let mut nav = with_game("e4 e5");
        nav.end();

        assert_eq!(nav.apply_san("Nf3").unwrap(), MoveOutcome::NewVariation(0));
        assert_eq!(nav.main_line().len(), 2);
        assert_eq!(nav.variations()[0].anchor_index, 2);
        assert_eq!(nav.cursor(), Cursor::in_variation(3, 0));
    }

    #[test]
    fn test_moves_in_variation_append() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("Nc3").unwrap();

        assert_eq!(nav.apply_san("Nc6").unwrap(), MoveOutcome::ExtendedVariation(0));
        assert_eq!(nav.variations()[0].moves, vec!["Nc3", "Nc6"]);
        assert_eq!(nav.cursor(), Cursor::in_variation(3, 0));
    }

    #[test]
    fn test_to_variation_reenters_at_anchor() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("Nc3").unwrap();
        nav.apply_san("Nc6").unwrap();
        nav.start();

        assert!(nav.to_variation(0));
        assert_eq!(nav.cursor(), Cursor::in_variation(1, 0));
        assert_eq!(nav.position_id(), "e4");

        assert!(nav.next());
        assert_eq!(nav.position_id(), "e4 Nc3");
        assert!(nav.end());
        assert_eq!(nav.position_id(), "e4 Nc3 Nc6");
        assert!(!nav.next());
    }

    #[test]
    fn test_deviation_inside_variation_forks() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("Nc3").unwrap();
        nav.apply_san("Nc6").unwrap();
        nav.go_to(2, Some(0));

        assert_eq!(nav.apply_san("d5").unwrap(), MoveOutcome::NewVariation(1));
        assert_eq!(nav.variations()[0].moves, vec!["Nc3", "Nc6"]);
        assert_eq!(nav.variations()[1].anchor_index, 1);
        assert_eq!(nav.variations()[1].moves, vec!["Nc3", "d5"]);
        assert_eq!(nav.position_id(), "e4 Nc3 d5");
    }

    #[test]
    fn test_main_line_move_at_anchor_follows_main_line() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("c5").unwrap();
        nav.to_variation(0);

        assert_eq!(nav.apply_san("e5").unwrap(), MoveOutcome::FollowedMainLine);
        assert_eq!(nav.variations().len(), 1);
        assert_eq!(nav.cursor(), Cursor::main_line(2));
        assert_eq!(nav.position_id(), "e4 e5");

        // Anything else at the anchor still opens a sibling variation.
        nav.to_variation(0);
        assert_eq!(nav.apply_san("d6").unwrap(), MoveOutcome::NewVariation(1));
        assert_eq!(nav.variations()[1], Variation::new(1, "d6".to_string()));
    }

    #[test]
    fn test_following_variation_move_does_not_append() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("Nc3").unwrap();
        nav.apply_san("Nc6").unwrap();
        nav.go_to(2, Some(0));

        assert_eq!(nav.apply_san("Nc6").unwrap(), MoveOutcome::FollowedVariation(0));
        assert_eq!(nav.variations().len(), 1);
        assert_eq!(nav.variations()[0].moves.len(), 2);
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        let before = (nav.main_line().to_vec(), nav.variations().to_vec(), nav.cursor());

        let err = nav.apply_san("??").unwrap_err();

        assert!(matches!(err, NavigatorError::IllegalMove(_)));
        assert_eq!(
            (nav.main_line().to_vec(), nav.variations().to_vec(), nav.cursor()),
            before
        );
    }

    #[test]
    fn test_out_of_range_navigation_is_ignored() {
        let mut nav = with_game("e4 e5");
        nav.go_to(1, None);

        assert!(!nav.go_to(3, None));
        assert!(!nav.to_variation(0));
        assert_eq!(nav.cursor(), Cursor::main_line(1));

        nav.end();
        assert!(!nav.next());
        assert_eq!(nav.cursor(), Cursor::main_line(2));
    }

    #[test]
    fn test_invalid_variation_falls_back_to_main_line() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("Nc3").unwrap();

        // Index 3 is past the variation's end but on the main line.
        assert!(nav.go_to(3, Some(0)));
        assert_eq!(nav.cursor(), Cursor::main_line(3));
        assert_eq!(nav.position_id(), "e4 e5 Nf3");
    }

    #[test]
    fn test_previous_leaves_variation_at_anchor() {
        let mut nav = with_game("e4 e5 Nf3");
        nav.go_to(1, None);
        nav.apply_san("Nc3").unwrap();
        nav.apply_san("Nc6").unwrap();

        assert!(nav.previous());
        assert_eq!(nav.cursor(), Cursor::in_variation(2, 0));
        assert!(nav.previous());
        assert_eq!(nav.cursor(), Cursor::main_line(1));
        assert_eq!(nav.position_id(), "e4");
    }

    #[test]
    fn test_to_main_line_clamps_index() {
        let mut nav = with_game("e4");
        nav.end();
        nav.apply_san("e5").unwrap();
        nav.apply_san("Nf3").unwrap();
        assert_eq!(nav.cursor(), Cursor::in_variation(3, 0));

        assert!(nav.to_main_line());
        assert_eq!(nav.cursor(), Cursor::main_line(1));
        assert!(!nav.to_main_line());
    }

    #[test]
    fn test_main_line_only_rejects_branches() {
        let mut nav = Navigator::new(AnyMoveRules, VariationMode::MainLineOnly);
        nav.load_game(&record("e4 e5")).unwrap();
        nav.go_to(1, None);
        assert_eq!(nav.mode(), VariationMode::MainLineOnly);

        assert!(matches!(
            nav.apply_san("c5"),
            Err(NavigatorError::BranchingDisabled)
        ));
        assert_eq!(nav.cursor(), Cursor::main_line(1));
        assert_eq!(nav.apply_san("e5").unwrap(), MoveOutcome::FollowedMainLine);
    }

    #[test]
    fn test_load_game_discards_variations() {
        let mut nav = with_game("e4 e5");
        nav.go_to(0, None);
        nav.apply_san("d4").unwrap();

        nav.load_game(&record("c4")).unwrap();

        assert!(nav.variations().is_empty());
        assert_eq!(nav.main_line(), &["c4".to_string()]);
        assert_eq!(nav.cursor(), Cursor::default());
    }

    #[test]
    fn test_reset_returns_to_freeform() {
        let mut nav = with_game("e4 e5");
        nav.end();
        nav.reset();

        assert!(!nav.has_record());
        assert!(nav.main_line().is_empty());
        assert_eq!(nav.apply_san("d4").unwrap(), MoveOutcome::ExtendedMainLine);
    }

    #[test]
    fn test_observers_see_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut nav = Navigator::new(AnyMoveRules, VariationMode::Branching);
        nav.add_observer(Box::new(Recorder(events.clone())));

        nav.apply_san("e4").unwrap();
        nav.start();
        nav.apply_san("d4").unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                Event::History(vec!["e4".to_string()]),
                Event::Cursor(1),
                Event::Cursor(0),
                Event::Variations(1),
                Event::Cursor(1),
            ]
        );
    }

    #[test]
    fn test_boundaries_follow_the_active_track() {
        let mut nav = with_game("e4 e5 Nf3");
        assert!(nav.at_start());
        assert!(!nav.at_end());

        nav.go_to(1, None);
        assert!(!nav.at_start() && !nav.at_end());
        nav.apply_san("c5").unwrap();
        // The variation ends one ply past its anchor, before the main line does.
        assert!(nav.at_end());

        nav.to_main_line();
        assert!(!nav.at_end());
        nav.end();
        assert!(nav.at_end());
    }

    #[test]
    fn test_go_to_is_idempotent() {
        let mut nav = with_game("e4 e5 Nf3 Nc6");
        nav.go_to(3, None);
        let first = nav.position().clone();
        nav.go_to(3, None);
        assert_eq!(nav.position(), &first);
    }
}
