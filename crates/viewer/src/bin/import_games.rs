//! Import games into the local library without starting the viewer.
//!
//! Usage:
//!   import-games [USERNAME] [--max N]     fetch from Lichess
//!   import-games --pgn FILE USERNAME      read a local PGN file (ids from
//!                                         the Site header when it has one)
//!   import-games --export USERNAME        write the stored games as PGN
//!
//! USERNAME defaults to LICHESS_USERNAME, or the token's account.

use std::env;
use std::fs;

use anyhow::Context;
use chess_core::pgn::{record_from_pgn, site_game_id, split_games};
use tracing_subscriber::EnvFilter;
use viewer::clients::lichess::LichessClient;
use viewer::{Config, GameLibrary};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let library = GameLibrary::new(&config.games_dir);

    let args: Vec<String> = env::args().collect();
    let mut username = config.username.clone();
    let mut max_games = config.max_games;
    let mut pgn_file = None;
    let mut export = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--max" => {
                max_games = args.get(i + 1).and_then(|s| s.parse().ok()).unwrap_or(max_games);
                i += 1;
            }
            "--pgn" => {
                pgn_file = args.get(i + 1).cloned();
                i += 1;
            }
            "--export" => export = true,
            name => username = Some(name.to_string()),
        }
        i += 1;
    }

    if export {
        let username = username.context("--export needs a username")?;
        let path = library.export_pgn(&username)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if let Some(file) = pgn_file {
        let username = username.context("--pgn needs a username to file the games under")?;
        let text = fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
        let games: Vec<_> = split_games(&text)
            .iter()
            .enumerate()
            .map(|(n, pgn)| {
                let id = site_game_id(pgn).unwrap_or_else(|| format!("{username}-{}", n + 1));
                record_from_pgn(&id, pgn)
            })
            .collect();
        library.save_games(&username, &games)?;
        println!("Imported {} games from {file} for {username}", games.len());
        return Ok(());
    }

    let client = LichessClient::new(&config)?;
    let username = match username {
        Some(name) => name,
        None => client.fetch_account().await?.username,
    };

    if client.validate_user(&username).await?.is_none() {
        anyhow::bail!("User \"{username}\" not found on Lichess");
    }

    let games = client.fetch_user_games(&username, max_games).await?;
    library.save_games(&username, &games)?;
    println!("Imported {} games for {username}", games.len());

    Ok(())
}
