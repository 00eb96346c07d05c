//! TICTAC Core - Game engine and AI
//!
//! This crate provides the core game logic for TICTAC:
//! - Board state (3x3 grid, win/draw detection)
//! - Exhaustive minimax AI with alpha-beta pruning
//! - Game sessions that orchestrate turns and modes
//! - Game configuration

pub mod board;
pub mod ai;
pub mod session;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Coord, GameResult, Player, COLS, ROWS};
pub use ai::{AlphaBetaAI, Analysis, SearchResult, SearchStats, Searcher, LOSS_SCORE, WIN_SCORE};
pub use session::{GameSession, Mode, TurnReport, AI_PLAYER};
pub use config::GameConfig;
pub use error::{Error, Result};
