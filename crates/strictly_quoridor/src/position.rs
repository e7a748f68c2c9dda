//! Cell coordinates on the 9x9 board.

use crate::board::{Board, Direction};
use crate::error::BoundsError;
use derive_more::Display;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw `{row, col}` pair as it appears on the wire, before bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PositionRecord {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

/// A validated cell on the board.
///
/// Both coordinates are always within `[0, 8]`; the only ways to obtain a
/// `Position` go through [`Position::new`] or a neighbour lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(try_from = "PositionRecord", into = "PositionRecord")]
#[display("({row}, {col})")]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    /// Creates a position, rejecting coordinates off the board.
    pub fn new(row: i32, col: i32) -> Result<Self, BoundsError> {
        if Board::is_valid_cell(row, col) {
            Ok(Self { row, col })
        } else {
            Err(BoundsError::Cell { row, col })
        }
    }

    /// Builds a position from coordinates known to be on the board.
    pub(crate) const fn from_static(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Row index (0 is player 2's side, 8 is player 1's side).
    pub fn row(self) -> i32 {
        self.row
    }

    /// Column index.
    pub fn col(self) -> i32 {
        self.col
    }

    /// The neighbouring cell one step in `direction`, if it is on the board.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.col + dc).ok()
    }

    /// Index into a row-major 81-cell array.
    pub fn index(self) -> usize {
        (self.row * Board::SIZE + self.col) as usize
    }

    /// Row/column as a tuple.
    pub fn to_tuple(self) -> (i32, i32) {
        (self.row, self.col)
    }

    /// Converts back to the unchecked wire form.
    pub fn to_record(self) -> PositionRecord {
        PositionRecord {
            row: self.row,
            col: self.col,
        }
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = BoundsError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        Position::new(record.row, record.col)
    }
}

impl From<Position> for PositionRecord {
    fn from(pos: Position) -> Self {
        pos.to_record()
    }
}
