//! Fixture puzzles and helpers shared by the unit tests.

use crate::puzzle::{
    Constraints, HorizontalMarker as H, Position, PuzzleDefinition, VerticalMarker as V,
    GRID_SIZE,
};
use crate::session::{Session, Transition};

pub const SAMPLE_ID: &str = "20250102";

/// A small valid puzzle with three clues
pub fn sample_puzzle() -> PuzzleDefinition {
    puzzle_with_id(SAMPLE_ID)
}

pub fn puzzle_with_id(id: &str) -> PuzzleDefinition {
    PuzzleDefinition {
        id: id.to_string(),
        initial_grid: [
            [Some(1), None, None, None],
            [None, None, Some(1), None],
            [None, None, None, None],
            [None, Some(3), None, None],
        ],
        solution_grid: [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]],
        constraints: Constraints {
            horizontal: [
                [H::Left, H::None, H::None],
                [H::None, H::Right, H::None],
                [H::None, H::None, H::Right],
                [H::Right, H::None, H::None],
            ],
            vertical: [
                [V::None, V::None, V::Down, V::None],
                [V::None, V::Down, V::None, V::None],
                [V::Up, V::None, V::None, V::None],
            ],
        },
    }
}

/// Select `(row, col)` and enter `value`
pub fn enter_at(session: &mut Session, row: usize, col: usize, value: u8) -> Transition {
    session.select_cell(Position::new(row, col));
    session.enter_value(Some(value))
}

/// Fill every open cell with its solution value, returning the last outcome
pub fn solve_cleanly(session: &mut Session) -> Transition {
    let mut last = Transition::Ignored;
    for pos in Position::all() {
        if session.is_clue(pos) || session.value_at(pos).is_some() {
            continue;
        }
        let value = session.puzzle().solution_at(pos);
        last = enter_at(session, pos.row, pos.col, value);
    }
    last
}

/// Number of open cells in the sample puzzle
pub fn open_cells() -> usize {
    GRID_SIZE * GRID_SIZE - sample_puzzle().clue_count()
}
