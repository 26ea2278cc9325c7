//! Terminal chess viewer.
//!
//! Usage: chess-viewer [--user NAME] [--import] [--game N]
//!
//! Reads one command per line from stdin: key names (ArrowLeft, ArrowRight,
//! Home, End, m, r, Escape, 1-3), moves (`e2e4`, `e7e8q`, `Nf3`),
//! `game N`, `list`, `help`, `quit`.

use std::env;

use anyhow::Context;
use board_navigator::{Command, VariationMode};
use chess_core::GameRecord;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use viewer::clients::lichess::LichessClient;
use viewer::{Config, GameLibrary, ViewerSession};

struct Args {
    user: Option<String>,
    import: bool,
    game: Option<usize>,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        user: None,
        import: false,
        game: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--user" => {
                parsed.user = args.get(i + 1).cloned();
                i += 1;
            }
            "--import" => parsed.import = true,
            "--game" => {
                parsed.game = args.get(i + 1).and_then(|s| s.parse().ok());
                i += 1;
            }
            other => eprintln!("Ignoring unknown argument: {other}"),
        }
        i += 1;
    }
    parsed
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let mut config = Config::from_env()?;
    if args.user.is_some() {
        config.username = args.user.clone();
    }

    let library = GameLibrary::new(&config.games_dir);

    if args.import {
        let username = config
            .username
            .as_deref()
            .context("--import needs a username (--user or LICHESS_USERNAME)")?;
        let client = LichessClient::new(&config)?;
        let games = client.fetch_user_games(username, config.max_games).await?;
        library.save_games(username, &games)?;
        println!("Imported {} games for {username}", games.len());
    }

    let games = match config.username.as_deref() {
        Some(username) => library.load_games(username)?,
        None => Vec::new(),
    };

    let mut session = ViewerSession::from_config(&config);
    if let Some(n) = args.game {
        select(&mut session, &games, n);
    } else if !games.is_empty() {
        print_games(&games);
    }

    println!("{}", Command::help());
    if session.navigator().mode() == VariationMode::MainLineOnly {
        println!("Variations are off: moves that leave the main line are refused.");
    }
    draw(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "exit" => break,
            "list" => {
                print_games(&games);
                continue;
            }
            "help" => {
                println!("{}", Command::help());
                continue;
            }
            _ => {}
        }

        if let Some(n) = input.strip_prefix("game ") {
            match n.trim().parse() {
                Ok(n) => select(&mut session, &games, n),
                Err(_) => println!("Usage: game N"),
            }
        } else if let Some(command) = Command::from_key(input) {
            session.handle_command(command);
        } else if let Err(e) = session.play(input) {
            println!("{e}");
            continue;
        }
        draw(&session);
    }

    Ok(())
}

/// Select game `n` (1-based) from the list.
fn select(session: &mut ViewerSession, games: &[GameRecord], n: usize) {
    let Some(record) = n.checked_sub(1).and_then(|i| games.get(i)) else {
        println!("No game {n}; {} games loaded", games.len());
        return;
    };
    println!("{}", record.title());
    if let Err(e) = session.select_game(record.clone()) {
        println!("{e}");
    }
}

fn print_games(games: &[GameRecord]) {
    if games.is_empty() {
        println!("No games loaded. Import with --import.");
        return;
    }
    for (i, game) in games.iter().enumerate() {
        println!("{:>4}. {}", i + 1, game.title());
    }
}

fn draw(session: &ViewerSession) {
    println!();
    print!("{}", session.render_board());
    println!("{}", session.status_with_bounds());
    for line in session.move_list_lines() {
        println!("{line}");
    }
}
