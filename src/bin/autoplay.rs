//! Let the AI play one game and report how it went.
//!
//! Usage: `autoplay [config.json]`. Set `RUST_LOG=minesweeper_inference=trace`
//! to see the knowledge base after every move.

use std::{env, fs};

use anyhow::Context;
use minesweeper_inference::{GameConfig, GameStatus, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn load_config() -> anyhow::Result<GameConfig> {
    let Some(path) = env::args().nth(1) else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let config: GameConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path))?;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    info!(?config, "starting game");

    let mut session = Session::new(&config)?;
    let status = session.play();

    println!("{}", session.knowledge());
    let mines: Vec<String> = session.board().mines().map(|cell| cell.to_string()).collect();
    println!("actual mines: {}", mines.join(", "));
    match status {
        GameStatus::Won => println!("The AI won."),
        GameStatus::Lost(cell) => println!("The AI hit a mine at {}.", cell),
        GameStatus::Stuck => println!("The AI ran out of moves."),
        GameStatus::InProgress => unreachable!("play() returns only once the game is over"),
    }
    Ok(())
}
