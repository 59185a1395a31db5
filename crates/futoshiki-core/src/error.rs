//! Error types.
//!
//! Session transitions never fail. The only reportable conditions are an
//! unavailable catalog source and a date with no puzzle; storage failures
//! travel on their own channel and are absorbed by the game controller.

use crate::date_key::DateKey;
use thiserror::Error;

/// Result type for game-level operations
pub type GameResult<T> = Result<T, GameError>;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced to the player
#[derive(Debug, Error)]
pub enum GameError {
    /// Catalog fetch failed or returned unparsable data
    #[error("could not load puzzles: {0}")]
    SourceUnavailable(String),
    /// The catalog has no puzzle for the requested date
    #[error("no puzzle found for {0}")]
    NoPuzzleForDate(DateKey),
}

impl GameError {
    /// Whether the player may simply try again later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}

/// Errors from durable storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
