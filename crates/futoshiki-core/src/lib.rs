//! Futoshiki Today engine
//!
//! Looks up the daily 4x4 Futoshiki puzzle, runs the player's session
//! through its state machine and persists it so a restart resumes the same
//! day's puzzle.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod date_key;
pub mod error;
pub mod game;
pub mod gateway;
pub mod puzzle;
pub mod session;
pub mod share;
pub mod source;
pub mod store;

#[cfg(test)]
mod test_support;

pub use catalog::{find_puzzle, Catalog};
pub use config::{Config, Environment};
pub use date_key::DateKey;
pub use error::{GameError, GameResult, StoreError, StoreResult};
pub use game::Game;
pub use gateway::{CompletionHistory, PersistenceGateway};
pub use puzzle::{
    Constraints, Grid, HorizontalMarker, Position, PuzzleDefinition, VerticalMarker, GRID_SIZE,
};
pub use session::{CompletionRecord, MoveTag, Session, SessionPhase, Transition};
pub use source::CatalogSource;
