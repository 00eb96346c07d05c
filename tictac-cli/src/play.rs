//! Play command - interactive terminal game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_loop()
//! - Level 3: handle_move(), parse_command()
//! - Level 4: output helpers

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Result;
use clap::Args;

use tictac_core::{GameConfig, GameSession, Mode};

use crate::best::render_board;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Game mode: pvp or pvai
    #[arg(long)]
    pub mode: Option<String>,

    /// Delay before a finished game restarts, in milliseconds
    #[arg(long)]
    pub restart_delay_ms: Option<u64>,
}

/// One line of player input
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Move { row: usize, col: usize },
    Restart,
    ToggleMode,
    Help,
    Quit,
}

const HELP: &str = "Enter a move as `row col` (0-2 each), or: restart, mode, help, quit";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Apply command-line overrides to the configuration
/// 2. Run the input loop on stdin/stdout
pub fn run(args: PlayArgs, config: GameConfig) -> Result<()> {
    let config = apply_overrides(config, &args)?;

    tracing::info!("Starting terminal game ({})", config.mode.label());

    let stdin = io::stdin();
    let stdout = io::stdout();
    play_loop(stdin.lock(), stdout.lock(), &config)
}

fn apply_overrides(mut config: GameConfig, args: &PlayArgs) -> Result<GameConfig> {
    if let Some(mode) = args.mode.as_deref() {
        config.mode = mode.parse::<Mode>()?;
    }
    if let Some(delay) = args.restart_delay_ms {
        config.restart_delay_ms = delay;
    }
    config.validate()?;
    Ok(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_loop<R: BufRead, W: Write>(input: R, mut out: W, config: &GameConfig) -> Result<()> {
    let mut session = GameSession::new(config.mode);

    writeln!(out, "{}", session.mode().label())?;
    writeln!(out, "{}", HELP)?;
    print_session(&mut out, &session)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Move { row, col }) => handle_move(&mut out, &mut session, row, col, config)?,
            Ok(Command::Restart) => {
                session.restart();
                print_session(&mut out, &session)?;
            }
            Ok(Command::ToggleMode) => {
                let mode = session.toggle_mode();
                writeln!(out, "Mode: {}", mode.label())?;
                print_session(&mut out, &session)?;
            }
            Ok(Command::Help) => writeln!(out, "{}", HELP)?,
            Ok(Command::Quit) => break,
            Err(message) => writeln!(out, "{}", message)?,
        }
        out.flush()?;
    }

    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn handle_move<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    row: usize,
    col: usize,
    config: &GameConfig,
) -> Result<()> {
    let report = match session.play_at(row, col) {
        Ok(report) => report,
        Err(e) => {
            writeln!(out, "{}", e)?;
            return Ok(());
        }
    };

    if let Some(ai_move) = report.ai_move {
        writeln!(out, "AI plays {}", ai_move)?;
    }
    print_session(out, session)?;

    if session.is_over() {
        writeln!(out, "Restarting in {} ms...", config.restart_delay_ms)?;
        out.flush()?;
        thread::sleep(config.restart_delay());
        session.restart();
        writeln!(out, "New game")?;
        print_session(out, session)?;
    }
    Ok(())
}

fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["quit"] | ["q"] | ["exit"] => Ok(Command::Quit),
        ["restart"] | ["r"] => Ok(Command::Restart),
        ["mode"] | ["m"] => Ok(Command::ToggleMode),
        ["help"] | ["h"] | ["?"] => Ok(Command::Help),
        [row, col] => {
            let row = row.parse().map_err(|_| format!("Invalid row: {}", row))?;
            let col = col.parse().map_err(|_| format!("Invalid column: {}", col))?;
            Ok(Command::Move { row, col })
        }
        _ => Err(format!("Unrecognized input: {}. {}", line.trim(), HELP)),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_session<W: Write>(out: &mut W, session: &GameSession) -> io::Result<()> {
    write!(out, "\n{}", render_board(session.board()))?;
    writeln!(out, "{}", session.status_text())
}

// ============================================================================
// TESTS
// ============================================================================
