//! Board representation, directions and terminal-state predicates.
//!
//! This module contains:
//! - The square tile grid and its validating constructors
//! - Movement directions and their string tokens
//! - Reorientation helpers (transpose, row reversal) used by the move engine
//! - Win and game-over predicates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tile value that wins the game
pub const WINNING_TILE: u32 = 2048;

/// Errors raised for malformed boards or direction tokens.
///
/// These signal programming errors on the caller's side (a board that is not
/// square, a cell that is not a power of two); normal play never produces them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Board has no rows")]
    EmptyBoard,

    #[error("Row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("Cell ({row}, {col}) holds {value}, expected 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },

    #[error("Unknown direction: {0:?}")]
    InvalidDirection(String),
}

/// A movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The canonical token for this direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = BoardError;

    /// Only the four lowercase tokens are accepted; key names and
    /// abbreviations are the caller's job to map.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(BoardError::InvalidDirection(other.to_string())),
        }
    }
}

/// A cell position, 0-indexed, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// True if two cells may combine into one: equal, non-empty, and the sum
/// still fits in a `u32`.
pub(crate) fn can_merge(a: u32, b: u32) -> bool {
    a != 0 && a == b && a.checked_mul(2).is_some()
}

fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// An N x N grid of tiles.
///
/// Cells are `0` (empty) or a power of two >= 2. Boards are values: every
/// operation returns a new board and never touches the receiver. The only
/// ways to obtain one are [`Board::new`], [`Board::from_rows`] and serde
/// deserialization, all of which uphold the invariants above.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Board {
    size: usize,
    /// Row-major cells, `size * size` long
    cells: Vec<u32>,
}

impl Board {
    /// Create an empty board of the given size.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Board size must be at least 1");
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a board from rows, validating shape and tile values.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }
            }
            cells.extend(values);
        }

        Ok(Self { size, cells })
    }

    /// Assemble a board from canonical rows produced by the move engine.
    pub(crate) fn from_lines(size: usize, lines: Vec<Vec<u32>>) -> Self {
        debug_assert_eq!(lines.len(), size);
        let cells: Vec<u32> = lines.into_iter().flatten().collect();
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at a position, or `None` if the position is off the board
    pub fn get(&self, pos: CellPos) -> Option<u32> {
        if pos.row < self.size && pos.col < self.size {
            Some(self.cells[pos.row * self.size + pos.col])
        } else {
            None
        }
    }

    /// Return a copy of this board with one cell replaced.
    pub(crate) fn with_tile(&self, pos: CellPos, value: u32) -> Board {
        debug_assert!(is_valid_tile(value));
        let mut next = self.clone();
        next.cells[pos.row * self.size + pos.col] = value;
        next
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Copy the board out as nested rows
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.rows().map(<[u32]>::to_vec).collect()
    }

    /// All empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<CellPos> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(i, _)| CellPos::new(i / self.size, i % self.size))
            .collect()
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Sum of all tile values
    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Largest tile on the board (0 for an empty board)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    // ==================== Reorientation ====================

    /// Swap rows and columns
    pub fn transpose(&self) -> Board {
        let n = self.size;
        let mut cells = vec![0; n * n];
        for r in 0..n {
            for c in 0..n {
                cells[c * n + r] = self.cells[r * n + c];
            }
        }
        Board { size: n, cells }
    }

    /// Mirror each row left-to-right
    pub fn reverse_rows(&self) -> Board {
        let cells = self
            .rows()
            .flat_map(|row| row.iter().rev().copied())
            .collect();
        Board {
            size: self.size,
            cells,
        }
    }

    // ==================== Terminal State ====================

    /// True if any tile has reached [`WINNING_TILE`]
    pub fn has_winning_tile(&self) -> bool {
        self.has_tile_at_least(WINNING_TILE)
    }

    /// True if any tile is at least `target`
    pub fn has_tile_at_least(&self, target: u32) -> bool {
        self.cells.iter().any(|&v| v >= target)
    }

    /// True if some move could still change the board.
    ///
    /// Structural check only: an empty cell, or two horizontally or vertically
    /// adjacent cells that can merge. This is the exact complement of game over.
    pub fn has_legal_move(&self) -> bool {
        if self.cells.contains(&0) {
            return true;
        }

        let n = self.size;
        for r in 0..n {
            for c in 0..n {
                let value = self.cells[r * n + c];
                if r + 1 < n && can_merge(value, self.cells[(r + 1) * n + c]) {
                    return true;
                }
                if c + 1 < n && can_merge(value, self.cells[r * n + c + 1]) {
                    return true;
                }
            }
        }
        false
    }
}

impl TryFrom<Vec<Vec<u32>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<u32>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len();
        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>width$}", ".", width = width)
                    } else {
                        format!("{:>width$}", v, width = width)
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
