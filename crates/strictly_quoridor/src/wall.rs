//! Wall values and the edges/slots they cover.

use crate::board::Board;
use crate::error::BoundsError;
use crate::position::Position;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Which way a wall runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    /// Lies between two rows; blocks up/down moves.
    Horizontal,
    /// Lies between two columns; blocks left/right moves.
    Vertical,
}

/// An ordered pair of adjacent cells whose connecting move is blocked.
pub type Edge = (Position, Position);

/// What part of the wall grid a slot token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKind {
    /// Half of a horizontal wall.
    Horizontal,
    /// Half of a vertical wall.
    Vertical,
    /// The crossing point in the middle of any wall.
    Center,
}

/// A unit of wall-grid space a placed wall occupies.
///
/// Two walls overlap or cross exactly when their slot sets intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallSlot {
    /// Wall-grid row.
    pub row: i32,
    /// Wall-grid column.
    pub col: i32,
    /// Slot kind.
    pub kind: SlotKind,
}

impl WallSlot {
    fn new(row: i32, col: i32, kind: SlotKind) -> Self {
        Self { row, col, kind }
    }
}

/// Raw `{row, col, orientation}` triple as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct WallRecord {
    /// Anchor row.
    pub row: i32,
    /// Anchor column.
    pub col: i32,
    /// Wall orientation.
    pub orientation: Orientation,
}

/// A two-cell-long wall anchored at a wall-grid coordinate.
///
/// A horizontal wall at `(r, c)` runs below cells `(r, c)` and `(r, c + 1)`;
/// a vertical wall at `(r, c)` runs right of cells `(r, c)` and `(r + 1, c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "WallRecord", into = "WallRecord")]
pub struct Wall {
    row: i32,
    col: i32,
    orientation: Orientation,
}

impl Wall {
    /// Creates a wall, rejecting anchors outside `[0, 7]`.
    pub fn new(row: i32, col: i32, orientation: Orientation) -> Result<Self, BoundsError> {
        if Board::is_valid_wall_slot(row, col) {
            Ok(Self {
                row,
                col,
                orientation,
            })
        } else {
            Err(BoundsError::WallSlot { row, col })
        }
    }

    /// Anchor row.
    pub fn row(&self) -> i32 {
        self.row
    }

    /// Anchor column.
    pub fn col(&self) -> i32 {
        self.col
    }

    /// Orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Every wall that could exist on the board (8 x 8 x 2).
    pub fn all() -> impl Iterator<Item = Wall> {
        (0..Board::WALL_POSITIONS).flat_map(|row| {
            (0..Board::WALL_POSITIONS).flat_map(move |col| {
                Orientation::iter().map(move |orientation| Wall {
                    row,
                    col,
                    orientation,
                })
            })
        })
    }

    /// The cell moves this wall blocks, in both directions.
    pub fn severed_edges(&self) -> [Edge; 4] {
        let (r, c) = (self.row, self.col);
        let cell = |row, col| Position::from_static(row, col);
        let (a, b, x, y) = match self.orientation {
            Orientation::Horizontal => (cell(r, c), cell(r + 1, c), cell(r, c + 1), cell(r + 1, c + 1)),
            Orientation::Vertical => (cell(r, c), cell(r, c + 1), cell(r + 1, c), cell(r + 1, c + 1)),
        };
        [(a, b), (b, a), (x, y), (y, x)]
    }

    /// The wall-grid slots this wall occupies.
    pub fn occupied_slots(&self) -> [WallSlot; 3] {
        let (r, c) = (self.row, self.col);
        match self.orientation {
            Orientation::Horizontal => [
                WallSlot::new(r, c, SlotKind::Horizontal),
                WallSlot::new(r, c + 1, SlotKind::Horizontal),
                WallSlot::new(r, c, SlotKind::Center),
            ],
            Orientation::Vertical => [
                WallSlot::new(r, c, SlotKind::Vertical),
                WallSlot::new(r + 1, c, SlotKind::Vertical),
                WallSlot::new(r, c, SlotKind::Center),
            ],
        }
    }

    /// True if the two walls overlap or cross.
    pub fn intersects(&self, other: &Wall) -> bool {
        let mine = self.occupied_slots();
        other.occupied_slots().iter().any(|slot| mine.contains(slot))
    }

    /// Converts back to the unchecked wire form.
    pub fn to_record(&self) -> WallRecord {
        WallRecord {
            row: self.row,
            col: self.col,
            orientation: self.orientation,
        }
    }
}

impl TryFrom<WallRecord> for Wall {
    type Error = BoundsError;

    fn try_from(record: WallRecord) -> Result<Self, Self::Error> {
        Wall::new(record.row, record.col, record.orientation)
    }
}

impl From<Wall> for WallRecord {
    fn from(wall: Wall) -> Self {
        wall.to_record()
    }
}

impl std::fmt::Display for Wall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wall at ({}, {})", self.orientation, self.row, self.col)
    }
}
