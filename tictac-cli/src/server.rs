//! Serve command - start the HTTP server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to tictac-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use tictac_core::{GameConfig, Mode};
use tictac_server::{run_server, ServerConfig, DEFAULT_MAX_SESSIONS};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing static files for the front-end
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Mode for new sessions: pvp or pvai
    #[arg(long)]
    pub mode: Option<String>,

    /// Delay before a finished game restarts, in milliseconds
    #[arg(long)]
    pub restart_delay_ms: Option<u64>,

    /// Live game sessions kept before the least recently used is dropped
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs, game: GameConfig) -> Result<()> {
    let config = configure_server(&args, game)?;

    tracing::info!(
        "Starting TICTAC server on port {} ({}, restart after {} ms)",
        config.port,
        config.game.mode.label(),
        config.game.restart_delay_ms
    );

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs, mut game: GameConfig) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    if let Some(mode) = args.mode.as_deref() {
        game.mode = mode.parse::<Mode>()?;
    }
    if let Some(delay) = args.restart_delay_ms {
        game.restart_delay_ms = delay;
    }
    game.validate()?;
    if args.max_sessions == 0 {
        anyhow::bail!("--max-sessions must be at least 1");
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        game,
        max_sessions: args.max_sessions,
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but only the API is available.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
