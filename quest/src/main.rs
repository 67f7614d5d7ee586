//! The Dragon's Quest terminal game.
//!
//! A menu-driven text adventure: buy gear in the village, earn gold in the
//! forest, and defeat the dragon in the mountains.
//!
//! ```bash
//! cargo run -p quest -- --name "Aria" -v
//! ```
//!
//! The player name can also come from `QUEST_PLAYER_NAME`, including via a
//! `.env` file. Logs go to stderr so they never mix with the game text.

mod console;
mod menu;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use console::Console;
use log::info;
use quest_core::{GameSession, SessionConfig};
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "quest")]
#[command(about = "The Dragon's Quest, a text adventure")]
#[command(version)]
struct Cli {
    /// Player name (skips the name prompt)
    #[arg(short, long, env = "QUEST_PLAYER_NAME")]
    name: Option<String>,

    /// Print the final game state as JSON when the game ends
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v, -vv, -vvv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    render::banner(&mut output)?;

    let name = match cli.name {
        Some(name) => name,
        None => {
            let prompt = "\nWhat is your name, brave adventurer? ";
            match console::ask(&mut input, &mut output, prompt)? {
                Some(name) => name,
                None => return Ok(()),
            }
        }
    };
    let name = if name.trim().is_empty() {
        "Adventurer".to_string()
    } else {
        name.trim().to_string()
    };

    let session = GameSession::new(SessionConfig::new(name));
    info!("starting game for {}", session.player_name());

    let mut console = Console::new(session, input, output);
    console.welcome()?;
    let ending = console.run().context("game loop failed")?;
    info!("game ended: {ending:?}");

    let (session, mut output) = console.into_parts();
    if cli.json {
        let json = serde_json::to_string_pretty(&session.snapshot())?;
        writeln!(output, "{json}")?;
    }
    output.flush()?;

    Ok(())
}

fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // RUST_LOG overrides the flag
    builder.parse_default_env();
    builder.target(env_logger::Target::Stderr);
    builder.init();
}
