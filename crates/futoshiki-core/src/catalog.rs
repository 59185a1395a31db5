//! Daily puzzle catalog lookup.

use crate::date_key::DateKey;
use crate::error::{GameError, GameResult};
use crate::puzzle::PuzzleDefinition;

/// Find the first puzzle whose id equals `date_key`
pub fn find_puzzle<'a>(
    catalog: &'a [PuzzleDefinition],
    date_key: &DateKey,
) -> Option<&'a PuzzleDefinition> {
    catalog.iter().find(|puzzle| date_key.matches(&puzzle.id))
}

/// A fetched list of daily puzzles
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    puzzles: Vec<PuzzleDefinition>,
}

impl Catalog {
    pub fn new(puzzles: Vec<PuzzleDefinition>) -> Self {
        Self { puzzles }
    }

    pub fn puzzles(&self) -> &[PuzzleDefinition] {
        &self.puzzles
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Look up a date, reporting a miss as [`GameError::NoPuzzleForDate`]
    pub fn puzzle_for(&self, date_key: &DateKey) -> GameResult<&PuzzleDefinition> {
        find_puzzle(&self.puzzles, date_key)
            .ok_or_else(|| GameError::NoPuzzleForDate(date_key.clone()))
    }
}
