//! PGN utilities: regex-based header extraction plus a `pgn-reader` visitor
//! that decodes and validates the mainline.

use std::io;
use std::ops::ControlFlow;
use std::sync::LazyLock;

use pgn_reader::{Reader, SanPlus, Visitor};
use regex::Regex;
use shakmaty::Chess;

use crate::game_data::GameRecord;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("static header regex"));

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("Illegal move '{san}' at ply {ply}")]
    IllegalMove { san: String, ply: usize },

    #[error("No game found in notation text")]
    Empty,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Tag pairs the viewer cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnHeaders {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub event: Option<String>,
}

/// Extract known headers from a PGN string.
pub fn parse_headers(pgn: &str) -> PgnHeaders {
    let mut headers = PgnHeaders::default();

    for cap in HEADER_RE.captures_iter(pgn) {
        let value = cap[2].to_string();
        match &cap[1] {
            "White" => headers.white = Some(value),
            "Black" => headers.black = Some(value),
            "Result" => headers.result = Some(value),
            "Date" => headers.date = Some(value),
            "TimeControl" => headers.time_control = Some(value),
            "ECO" => headers.eco = Some(value),
            "Event" => headers.event = Some(value),
            _ => {}
        }
    }

    headers
}

/// Extract a single header value. Empty values count as missing.
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]*)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(pgn)?.get(1)?.as_str().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Game id from a `Site` header such as `https://lichess.org/abcd1234`.
pub fn site_game_id(pgn: &str) -> Option<String> {
    let site = extract_header(pgn, "Site")?;
    let (_, path) = site.split_once("://")?;
    let id = path.trim_end_matches('/').rsplit('/').next()?;
    let plausible = !id.is_empty()
        && path.contains('/')
        && id.bytes().all(|b| b.is_ascii_alphanumeric());
    plausible.then(|| id.to_string())
}

/// Build a record from raw PGN text, e.g. a file picked by the user.
pub fn record_from_pgn(id: &str, pgn: &str) -> GameRecord {
    let headers = parse_headers(pgn);
    GameRecord {
        id: id.to_string(),
        white: headers.white.unwrap_or_else(|| "Unknown".to_string()),
        black: headers.black.unwrap_or_else(|| "Unknown".to_string()),
        result: headers.result.unwrap_or_else(|| "*".to_string()),
        date: headers.date.unwrap_or_default(),
        eco: headers.eco,
        pgn: pgn.to_string(),
        time_control: headers.time_control,
        event: headers.event,
    }
}

/// Split a multi-game PGN file into one text per game. A tag line that
/// follows movetext starts the next game.
pub fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut seen_movetext = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if seen_movetext {
                games.push(current.trim().to_string());
                current.clear();
                seen_movetext = false;
            }
        } else if !trimmed.is_empty() {
            seen_movetext = true;
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        games.push(current.trim().to_string());
    }
    games
}

/// Replays the mainline while reading it, so every SAN is checked against
/// the position it is played from. Side lines are skipped by the reader.
struct MainlineDecoder;

struct DecodeState {
    pos: Chess,
    moves: Vec<String>,
}

impl Visitor for MainlineDecoder {
    type Tags = ();
    type Movetext = DecodeState;
    type Output = Result<Vec<String>, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(DecodeState {
            pos: Chess::default(),
            moves: Vec::new(),
        })
    }

    fn san(&mut self, state: &mut DecodeState, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        match san_plus.san.to_move(&state.pos) {
            Ok(mv) => {
                // Re-render so check markers and disambiguation match what the
                // rules engine produces for moves played on the board.
                let san = SanPlus::from_move_and_play_unchecked(&mut state.pos, mv);
                state.moves.push(san.to_string());
                ControlFlow::Continue(())
            }
            Err(e) => {
                let ply = state.moves.len() + 1;
                tracing::debug!(san = %san_plus, ply, "Illegal move in PGN: {e}");
                ControlFlow::Break(Err(PgnError::IllegalMove {
                    san: san_plus.san.to_string(),
                    ply,
                }))
            }
        }
    }

    fn end_game(&mut self, state: DecodeState) -> Self::Output {
        Ok(state.moves)
    }
}

/// Decode the mainline of the first game in `pgn` into SAN moves.
///
/// Comments, NAGs and parenthesised variations are ignored. A game with
/// headers but no moves decodes to an empty list; text with no game at all is
/// `PgnError::Empty`.
pub fn decode_moves(pgn: &str) -> Result<Vec<String>, PgnError> {
    let mut reader = Reader::new(io::Cursor::new(pgn.as_bytes()));
    match reader.read_game(&mut MainlineDecoder)? {
        Some(result) => result,
        None => Err(PgnError::Empty),
    }
}
