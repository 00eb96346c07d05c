//! Error types for the TICTAC core

use thiserror::Error;

/// Main error type for the core crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("coordinate ({row}, {col}) is out of bounds (rows and columns must be 0-2)")]
    OutOfBounds { row: usize, col: usize },

    #[error("invalid move: cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    #[error("game already over")]
    GameOver,

    #[error("it is not {0}'s turn")]
    NotYourTurn(crate::board::Player),

    #[error("board string has {got} cells, expected {expected}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid character '{character}' at cell {position} (expected 'x', 'o' or '.')")]
    InvalidCellCharacter { character: char, position: usize },

    #[error("invalid player '{0}' (expected 'x' or 'o')")]
    InvalidPlayer(String),

    #[error("invalid mode '{0}' (expected 'pvp' or 'pvai')")]
    InvalidMode(String),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the core crate
pub type Result<T> = std::result::Result<T, Error>;
