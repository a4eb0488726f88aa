//! The directional move/merge algorithm.
//!
//! Every direction is reduced to one canonical case, "slide and merge each
//! row toward the left edge", by reorienting the board before and after.

use crate::board::{can_merge, Board, Direction, WINNING_TILE};
use serde::{Deserialize, Serialize};

/// A board reorientation
type Reorient = fn(&Board) -> Board;

/// Result of sliding a single row to the left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// The compacted, merged row padded back to its original length
    pub line: Vec<u32>,
    /// Sum of all tiles created by merges in this row
    pub score_gained: u64,
    /// Whether a merge produced a tile of at least the target value
    pub reached_target: bool,
}

/// Result of a move. The input board is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The board after sliding and merging, before any tile is spawned
    pub board: Board,
    /// Whether any cell differs from the input board
    pub moved: bool,
    pub score_gained: u64,
    pub reached_target: bool,
}

/// Slide one row toward index 0.
///
/// Zeros are dropped first, so tiles separated by gaps still merge. Each
/// tile takes part in at most one merge: `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`.
pub fn slide_line_left(line: &[u32], target: u32) -> LineOutcome {
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut merged = Vec::with_capacity(line.len());
    let mut score_gained = 0;
    let mut reached_target = false;

    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && can_merge(tiles[i], tiles[i + 1]) {
            let value = tiles[i] * 2;
            merged.push(value);
            score_gained += u64::from(value);
            if value >= target {
                reached_target = true;
            }
            i += 2;
        } else {
            merged.push(tiles[i]);
            i += 1;
        }
    }
    merged.resize(line.len(), 0);

    LineOutcome {
        line: merged,
        score_gained,
        reached_target,
    }
}

fn transpose_then_reverse(board: &Board) -> Board {
    board.transpose().reverse_rows()
}

fn reverse_then_transpose(board: &Board) -> Board {
    board.reverse_rows().transpose()
}

/// The (forward, inverse) reorientation pair mapping `direction` onto a
/// leftward slide and back.
pub fn orientation(direction: Direction) -> (Reorient, Reorient) {
    match direction {
        Direction::Left => (Board::clone, Board::clone),
        Direction::Right => (Board::reverse_rows, Board::reverse_rows),
        Direction::Up => (Board::transpose, Board::transpose),
        Direction::Down => (transpose_then_reverse, reverse_then_transpose),
    }
}

impl Board {
    /// Slide and merge every tile in `direction`, using [`WINNING_TILE`] as
    /// the target.
    pub fn shift(&self, direction: Direction) -> MoveOutcome {
        self.shift_with_target(direction, WINNING_TILE)
    }

    /// Slide and merge every tile in `direction`; `reached_target` is set when
    /// a merge creates a tile of at least `target`.
    pub fn shift_with_target(&self, direction: Direction, target: u32) -> MoveOutcome {
        let (forward, inverse) = orientation(direction);
        let canonical = forward(self);

        let mut lines = Vec::with_capacity(self.size());
        let mut score_gained = 0;
        let mut reached_target = false;
        for row in canonical.rows() {
            let outcome = slide_line_left(row, target);
            score_gained += outcome.score_gained;
            reached_target |= outcome.reached_target;
            lines.push(outcome.line);
        }

        let board = inverse(&Board::from_lines(self.size(), lines));
        let moved = board != *self;

        MoveOutcome {
            board,
            moved,
            score_gained,
            reached_target,
        }
    }

    /// Directions that would change this board
    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.shift(d).moved)
            .collect()
    }
}
