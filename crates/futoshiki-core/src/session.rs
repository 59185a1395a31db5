//! Session state machine for one puzzle attempt.
//!
//! A session starts `Fresh`, becomes `Active` once the player places a value
//! and ends `Completed` when the grid equals the solution. `reset` brings it
//! back to a clean board. Every transition is total: actions whose
//! preconditions do not hold are reported as [`Transition::Ignored`] and leave
//! the session untouched.

use crate::clock::Clock;
use crate::puzzle::{is_valid_value, Grid, Position, PuzzleDefinition, GRID_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of one player action, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveTag {
    /// Empty cell filled with the solution value
    Correct,
    /// Empty cell filled with a wrong value
    Incorrect,
    /// Filled cell overwritten with a different value
    Change,
    /// Filled cell erased
    Clear,
    /// Completed without a single incorrect entry
    Perfect,
    /// Board reset by the player
    Reset,
}

impl MoveTag {
    /// Glyph used in share text
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Correct => "✅",
            Self::Incorrect => "❌",
            Self::Change => "🔄",
            Self::Clear => "🔙",
            Self::Perfect => "⭐",
            Self::Reset => "🔁",
        }
    }
}

impl fmt::Display for MoveTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Correct => "CORRECT",
            Self::Incorrect => "INCORRECT",
            Self::Change => "CHANGE",
            Self::Clear => "CLEAR",
            Self::Perfect => "PERFECT",
            Self::Reset => "RESET",
        };
        f.write_str(name)
    }
}

/// Lifetime record of a completed puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub puzzle_id: String,
    pub completion_timestamp: DateTime<Utc>,
    pub time_spent_seconds: u64,
    pub move_log: Vec<MoveTag>,
}

/// Coarse lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No move since the session began or was last reset
    Fresh,
    /// At least one move since the session began or was last reset
    Active,
    Completed,
}

/// Outcome of a session transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Preconditions did not hold; nothing changed
    Ignored,
    /// State changed without a log entry
    Applied,
    /// State changed and the move log gained this tag
    Logged(MoveTag),
    /// The entry completed the puzzle
    Completed(CompletionRecord),
}

impl Transition {
    /// Whether the session changed and must be persisted
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Mutable state of one puzzle attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    puzzle: PuzzleDefinition,
    grid: Grid,
    selected_cell: Option<Position>,
    is_revealed: bool,
    is_completed: bool,
    elapsed_time_seconds: u64,
    move_log: Vec<MoveTag>,
    #[serde(skip)]
    clock: Clock,
}

impl Session {
    /// A fresh, unrevealed attempt at `puzzle`
    pub fn new(puzzle: PuzzleDefinition) -> Self {
        Self {
            grid: puzzle.initial_grid,
            puzzle,
            selected_cell: None,
            is_revealed: false,
            is_completed: false,
            elapsed_time_seconds: 0,
            move_log: Vec::new(),
            clock: Clock::default(),
        }
    }

    /// A session already completed according to `record`
    pub fn from_completion(puzzle: PuzzleDefinition, record: &CompletionRecord) -> Self {
        Self {
            grid: puzzle.solution_as_grid(),
            puzzle,
            selected_cell: None,
            is_revealed: true,
            is_completed: true,
            elapsed_time_seconds: record.time_spent_seconds,
            move_log: record.move_log.clone(),
            clock: Clock::default(),
        }
    }

    /// Normalise a session restored from storage.
    ///
    /// Completed sessions show the canonical solution with the clock stopped;
    /// revealed, unfinished sessions get their clock back.
    pub fn resume(&mut self) {
        if self.is_completed {
            self.grid = self.puzzle.solution_as_grid();
            self.selected_cell = None;
            self.clock.stop();
        } else if self.is_revealed {
            self.clock.start();
        }
    }

    pub fn puzzle(&self) -> &PuzzleDefinition {
        &self.puzzle
    }

    pub fn puzzle_id(&self) -> &str {
        &self.puzzle.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn value_at(&self, pos: Position) -> Option<u8> {
        if pos.in_bounds() {
            self.grid[pos.row][pos.col]
        } else {
            None
        }
    }

    pub fn selected_cell(&self) -> Option<Position> {
        self.selected_cell
    }

    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn elapsed_time_seconds(&self) -> u64 {
        self.elapsed_time_seconds
    }

    pub fn move_log(&self) -> &[MoveTag] {
        &self.move_log
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_clue(&self, pos: Position) -> bool {
        self.puzzle.is_clue(pos)
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_completed {
            SessionPhase::Completed
        } else if self.moves_since_reset().next().is_none() {
            SessionPhase::Fresh
        } else {
            SessionPhase::Active
        }
    }

    fn moves_since_reset(&self) -> impl Iterator<Item = &MoveTag> {
        self.move_log
            .iter()
            .rev()
            .take_while(|tag| **tag != MoveTag::Reset)
    }

    /// Select a cell, or deselect it if it is already selected
    pub fn select_cell(&mut self, pos: Position) -> Transition {
        if self.is_completed || !pos.in_bounds() || self.puzzle.is_clue(pos) {
            return Transition::Ignored;
        }

        if self.selected_cell == Some(pos) {
            self.selected_cell = None;
        } else {
            self.selected_cell = Some(pos);
        }
        log::debug!("selection is now {:?}", self.selected_cell);
        Transition::Applied
    }

    /// Write `value` into the selected cell; `None` erases it.
    ///
    /// An applied entry consumes the selection.
    pub fn enter_value(&mut self, value: Option<u8>) -> Transition {
        if self.is_completed {
            return Transition::Ignored;
        }
        let Some(pos) = self.selected_cell else {
            return Transition::Ignored;
        };
        if value.is_some_and(|v| !is_valid_value(v)) {
            return Transition::Ignored;
        }

        let previous = self.grid[pos.row][pos.col];
        let tag = match (previous, value) {
            (None, None) => return Transition::Ignored,
            (Some(old), Some(new)) if old == new => return Transition::Ignored,
            (None, Some(new)) if new == self.puzzle.solution_at(pos) => MoveTag::Correct,
            (None, Some(_)) => MoveTag::Incorrect,
            (Some(_), Some(_)) => MoveTag::Change,
            (Some(_), None) => MoveTag::Clear,
        };

        self.move_log.push(tag);
        self.grid[pos.row][pos.col] = value;
        self.selected_cell = None;
        log::debug!("{} at {} ({:?} -> {:?})", tag, pos, previous, value);

        if value.is_some() {
            self.is_revealed = true;
            self.clock.start();
        }

        match self.evaluate_completion() {
            Some(record) => Transition::Completed(record),
            None => Transition::Logged(tag),
        }
    }

    /// Erase the selected cell
    pub fn clear_value(&mut self) -> Transition {
        self.enter_value(None)
    }

    /// Dismiss the intro overlay and start the clock
    pub fn reveal(&mut self) -> Transition {
        let newly_revealed = !self.is_revealed;
        self.is_revealed = true;
        let started = !self.is_completed && self.clock.start();
        if newly_revealed || started {
            Transition::Applied
        } else {
            Transition::Ignored
        }
    }

    /// Restore the initial board and restart the clock from zero
    pub fn reset(&mut self) -> Transition {
        self.move_log.push(MoveTag::Reset);
        self.grid = self.puzzle.initial_grid;
        self.selected_cell = None;
        self.elapsed_time_seconds = 0;
        self.is_completed = false;
        self.is_revealed = true;
        self.clock.stop();
        self.clock.start();
        log::info!("puzzle {} reset", self.puzzle.id);
        Transition::Logged(MoveTag::Reset)
    }

    /// Advance elapsed time by one second if the clock is running
    pub fn tick(&mut self) -> bool {
        if self.clock.is_running() && !self.is_completed {
            self.elapsed_time_seconds += 1;
            true
        } else {
            false
        }
    }

    /// Stop the clock, e.g. when the session is being replaced
    pub fn release_clock(&mut self) {
        self.clock.stop();
    }

    fn is_solved(&self) -> bool {
        (0..GRID_SIZE).all(|row| {
            (0..GRID_SIZE).all(|col| self.grid[row][col] == Some(self.puzzle.solution_grid[row][col]))
        })
    }

    fn evaluate_completion(&mut self) -> Option<CompletionRecord> {
        if self.is_completed || !self.is_solved() {
            return None;
        }

        self.clock.stop();
        if !self.move_log.contains(&MoveTag::Incorrect) {
            self.move_log.push(MoveTag::Perfect);
        }
        self.grid = self.puzzle.solution_as_grid();
        self.selected_cell = None;
        self.is_completed = true;

        log::info!(
            "puzzle {} completed in {}s with {} moves",
            self.puzzle.id,
            self.elapsed_time_seconds,
            self.move_log.len()
        );

        Some(CompletionRecord {
            puzzle_id: self.puzzle.id.clone(),
            completion_timestamp: Utc::now(),
            time_spent_seconds: self.elapsed_time_seconds,
            move_log: self.move_log.clone(),
        })
    }
}
