//! TICTAC CLI - Command-line interface
//!
//! Commands:
//! - play: Play in the terminal against a friend or the AI
//! - best: Ask the engine for the best move in a position
//! - selfplay: Engine-vs-engine games from random openings
//! - serve: Start the HTTP server

mod best;
mod play;
mod selfplay;
mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tictac_core::GameConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tictac")]
#[command(about = "Tic-tac-toe with an alpha-beta opponent")]
struct Cli {
    /// JSON game configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play(play::PlayArgs),
    /// Print the engine's move for a position
    Best(best::BestArgs),
    /// Run engine-vs-engine games
    Selfplay(selfplay::SelfplayArgs),
    /// Start the HTTP server
    Serve(server::ServerArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play(args) => play::run(args, config),
        Commands::Best(args) => best::run(args),
        Commands::Selfplay(args) => selfplay::run(args),
        Commands::Serve(args) => server::run(args, config),
    }
}

/// Log to stderr so command output on stdout stays clean
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}
