//! On-disk game library: one NDJSON file of records per imported user.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chess_core::GameRecord;

use crate::clients::lichess::is_valid_username;
use crate::error::AppError;

const GAMES_SUFFIX: &str = "_games.ndjson";

pub struct GameLibrary {
    dir: PathBuf,
}

impl GameLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `username`'s games. Names that aren't plain Lichess
    /// usernames are refused so they can't point outside the library.
    pub fn games_path(&self, username: &str) -> Result<PathBuf, AppError> {
        if !is_valid_username(username) {
            return Err(AppError::InvalidUsername(username.to_string()));
        }
        Ok(self.dir.join(format!("{username}{GAMES_SUFFIX}")))
    }

    /// Replace everything stored for `username` with `games`.
    pub fn save_games(&self, username: &str, games: &[GameRecord]) -> Result<(), AppError> {
        let path = self.games_path(username)?;
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("ndjson.tmp");

        let written = write_records(&tmp, games)
            .and_then(|()| fs::rename(&tmp, &path).map_err(AppError::from));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), "Could not remove temp file: {cleanup}");
            }
            return Err(e);
        }

        tracing::info!(username, count = games.len(), path = %path.display(), "Saved games");
        Ok(())
    }

    /// Stored games for `username`; empty if nothing was imported yet.
    pub fn load_games(&self, username: &str) -> Result<Vec<GameRecord>, AppError> {
        let path = self.games_path(username)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut games = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<GameRecord>(line) {
                Ok(game) => games.push(game),
                Err(e) => {
                    tracing::warn!(path = %path.display(), line = lineno + 1, "Skipping bad game record: {e}");
                }
            }
        }

        tracing::debug!(username, count = games.len(), "Loaded games");
        Ok(games)
    }

    /// Users with a stored game file, sorted.
    pub fn list_users(&self) -> Result<Vec<String>, AppError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                name.strip_suffix(GAMES_SUFFIX)
                    .filter(|user| !user.is_empty())
                    .map(str::to_string)
            })
            .collect();
        users.sort();
        Ok(users)
    }

    /// Write every stored game's PGN to `{username}_games.pgn`, blank-line
    /// separated. Returns the file path.
    pub fn export_pgn(&self, username: &str) -> Result<PathBuf, AppError> {
        let games = self.load_games(username)?;
        if games.is_empty() {
            return Err(AppError::NotFound(format!(
                "No games found to export for {username}"
            )));
        }

        let path = self.games_path(username)?.with_extension("pgn");
        let content = games
            .iter()
            .map(|g| g.pgn.trim())
            .collect::<Vec<_>>()
            .join("\n\n");
        fs::write(&path, content + "\n")?;

        tracing::info!(username, count = games.len(), path = %path.display(), "Exported PGN");
        Ok(path)
    }
}

fn write_records(path: &Path, games: &[GameRecord]) -> Result<(), AppError> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    for game in games {
        serde_json::to_writer(&mut writer, game)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        std::env::temp_dir().join(format!("viewer-lib-{name}-{}-{nanos}", std::process::id()))
    }

    fn game(id: &str) -> GameRecord {
        GameRecord {
            id: id.to_string(),
            white: "a".to_string(),
            black: "b".to_string(),
            result: "*".to_string(),
            date: "2024-01-01".to_string(),
            eco: None,
            pgn: "1. e4 e5 *".to_string(),
            time_control: None,
            event: None,
        }
    }

    #[test]
    fn test_missing_user_is_empty() {
        let library = GameLibrary::new(temp_dir("missing"));
        assert!(library.load_games("nobody").unwrap().is_empty());
        assert!(library.list_users().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_previous_games() {
        let dir = temp_dir("replace");
        let library = GameLibrary::new(&dir);
        library.save_games("alice", &[game("1"), game("2")]).unwrap();
        library.save_games("alice", &[game("3")]).unwrap();

        let ids: Vec<String> = library
            .load_games("alice")
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["3"]);
        assert_eq!(library.list_users().unwrap(), vec!["alice"]);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let library = GameLibrary::new(&dir);
        let line = serde_json::to_string(&game("ok")).unwrap();
        fs::write(library.games_path("bob").unwrap(), format!("{{broken\n{line}\n")).unwrap();

        let games = library.load_games("bob").unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "ok");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_path_like_usernames_are_refused() {
        let dir = temp_dir("names");
        let library = GameLibrary::new(dir.join("games"));

        for name in ["../x", "a/b", "..", "", "c:\\x"] {
            assert!(matches!(
                library.save_games(name, &[game("1")]),
                Err(AppError::InvalidUsername(_))
            ));
            assert!(matches!(library.load_games(name), Err(AppError::InvalidUsername(_))));
        }
        assert!(!dir.join("x_games.ndjson").exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let dir = temp_dir("tmpfile");
        let library = GameLibrary::new(&dir);
        // A directory in place of the target makes the final rename fail.
        fs::create_dir_all(library.games_path("dave").unwrap()).unwrap();

        assert!(library.save_games("dave", &[game("1")]).is_err());
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_export_pgn() {
        let dir = temp_dir("export");
        let library = GameLibrary::new(&dir);
        assert!(matches!(library.export_pgn("carol"), Err(AppError::NotFound(_))));

        library.save_games("carol", &[game("1"), game("2")]).unwrap();
        let path = library.export_pgn("carol").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "1. e4 e5 *\n\n1. e4 e5 *\n");

        fs::remove_dir_all(dir).ok();
    }
}
