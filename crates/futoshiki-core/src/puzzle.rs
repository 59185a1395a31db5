//! Puzzle definitions as published in the daily catalog.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of a puzzle grid
pub const GRID_SIZE: usize = 4;

/// Largest value a cell may hold
pub const MAX_VALUE: u8 = GRID_SIZE as u8;

/// A 4x4 grid of optional cell values
pub type Grid = [[Option<u8>; GRID_SIZE]; GRID_SIZE];

/// A fully filled 4x4 grid
pub type SolutionGrid = [[u8; GRID_SIZE]; GRID_SIZE];

/// Returns true if `value` is a legal cell value (1 to 4)
pub fn is_valid_value(value: u8) -> bool {
    (1..=MAX_VALUE).contains(&value)
}

/// A cell position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the position lies inside the grid
    pub fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// Iterate all positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Marker between two horizontally adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalMarker {
    #[default]
    None,
    Left,
    Right,
}

/// Marker between two vertically adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalMarker {
    #[default]
    None,
    Up,
    Down,
}

impl HorizontalMarker {
    fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Right => Some("right"),
        }
    }

    /// Glyph drawn between the two cells
    pub fn glyph(&self) -> char {
        match self {
            Self::None => ' ',
            Self::Left => '<',
            Self::Right => '>',
        }
    }
}

impl VerticalMarker {
    fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Up => Some("up"),
            Self::Down => Some("down"),
        }
    }

    /// Glyph drawn between the two cells
    pub fn glyph(&self) -> char {
        match self {
            Self::None => ' ',
            Self::Up => '∧',
            Self::Down => '∨',
        }
    }
}

// The catalog writes "no marker" as null, "" or "none", so markers go through
// an optional string on the wire.
impl Serialize for HorizontalMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HorizontalMarker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") | Some("none") => Ok(Self::None),
            Some("left") => Ok(Self::Left),
            Some("right") => Ok(Self::Right),
            Some(other) => Err(de::Error::unknown_variant(other, &["left", "right", "none"])),
        }
    }
}

impl Serialize for VerticalMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VerticalMarker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None | Some("") | Some("none") => Ok(Self::None),
            Some("up") => Ok(Self::Up),
            Some("down") => Ok(Self::Down),
            Some(other) => Err(de::Error::unknown_variant(other, &["up", "down", "none"])),
        }
    }
}

/// Inequality markers of a puzzle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constraints {
    /// `horizontal[row][col]` sits between `col` and `col + 1` of `row`
    pub horizontal: [[HorizontalMarker; GRID_SIZE - 1]; GRID_SIZE],
    /// `vertical[row][col]` sits between `row` and `row + 1` of `col`
    pub vertical: [[VerticalMarker; GRID_SIZE]; GRID_SIZE - 1],
}

/// One daily puzzle from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    /// Date key in `YYYYMMDD` form
    pub id: String,
    pub initial_grid: Grid,
    pub solution_grid: SolutionGrid,
    pub constraints: Constraints,
}

impl PuzzleDefinition {
    /// Whether the cell at `pos` is a given clue
    pub fn is_clue(&self, pos: Position) -> bool {
        pos.in_bounds() && self.initial_grid[pos.row][pos.col].is_some()
    }

    /// Solution value at `pos`
    pub fn solution_at(&self, pos: Position) -> u8 {
        self.solution_grid[pos.row][pos.col]
    }

    /// The solution as an optional-valued grid
    pub fn solution_as_grid(&self) -> Grid {
        self.solution_grid.map(|row| row.map(Some))
    }

    /// Number of clue cells
    pub fn clue_count(&self) -> usize {
        Position::all().filter(|&pos| self.is_clue(pos)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_puzzle;

    #[test]
    fn test_parse_catalog_record() {
        let json = r#"{
            "id": "20250102",
            "initial_grid": [[1, null, null, null], [null, null, 1, null], [null, null, null, null], [null, 3, null, null]],
            "solution_grid": [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]],
            "constraints": {
                "horizontal": [["left", null, ""], [null, "right", null], [null, null, null], ["none", null, "right"]],
                "vertical": [[null, null, "down", null], [null, "down", null, null], [null, null, null, null]]
            }
        }"#;

        let puzzle: PuzzleDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(puzzle.id, "20250102");
        assert_eq!(puzzle.clue_count(), 3);
        assert_eq!(puzzle.constraints.horizontal[0][0], HorizontalMarker::Left);
        assert_eq!(puzzle.constraints.horizontal[0][2], HorizontalMarker::None);
        assert_eq!(puzzle.constraints.horizontal[3][0], HorizontalMarker::None);
        assert_eq!(puzzle.constraints.vertical[0][2], VerticalMarker::Down);
        assert_eq!(puzzle.constraints.vertical[1][1], VerticalMarker::Down);
    }

    #[test]
    fn test_unknown_marker_is_rejected() {
        let result: Result<HorizontalMarker, _> = serde_json::from_str(r#""up""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_grid_shape_is_rejected() {
        let json = r#"{
            "id": "20250102",
            "initial_grid": [[1, null, null], [null, null, 1], [null, null, null]],
            "solution_grid": [[1, 2, 3], [3, 1, 2], [2, 3, 1]],
            "constraints": { "horizontal": [], "vertical": [] }
        }"#;
        assert!(serde_json::from_str::<PuzzleDefinition>(json).is_err());
    }

    #[test]
    fn test_markers_serialize_as_strings() {
        let puzzle = sample_puzzle();
        let value = serde_json::to_value(&puzzle.constraints).unwrap();
        assert_eq!(value["horizontal"][0][0], "left");
        assert!(value["horizontal"][0][1].is_null());
        assert_eq!(value["vertical"][0][2], "down");
        assert_eq!(value["vertical"][2][0], "up");
    }

    #[test]
    fn test_clues_and_solution() {
        let puzzle = sample_puzzle();
        assert!(puzzle.is_clue(Position::new(0, 0)));
        assert!(!puzzle.is_clue(Position::new(0, 1)));
        assert!(!puzzle.is_clue(Position::new(7, 7)));
        assert_eq!(puzzle.solution_at(Position::new(2, 2)), 4);
        assert_eq!(puzzle.solution_as_grid()[3][0], Some(4));
    }

    #[test]
    fn test_position_iteration_is_row_major() {
        let positions: Vec<Position> = Position::all().collect();
        assert_eq!(positions.len(), 16);
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[5], Position::new(1, 1));
        assert!(!Position::new(4, 0).in_bounds());
    }

    #[test]
    fn test_marker_glyphs() {
        assert_eq!(HorizontalMarker::Left.glyph(), '<');
        assert_eq!(HorizontalMarker::Right.glyph(), '>');
        assert_eq!(VerticalMarker::Up.glyph(), '∧');
        assert_eq!(VerticalMarker::Down.glyph(), '∨');
    }
}
