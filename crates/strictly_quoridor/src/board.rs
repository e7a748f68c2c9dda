//! Static board geometry.

use crate::position::Position;

/// One of the four orthogonal directions a pawn can move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards row 8.
    Down,
    /// Towards column 0.
    Left,
    /// Towards column 8.
    Right,
}

impl Direction {
    /// All directions, in the order moves are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column delta of one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The two directions at right angles to this one.
    pub fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Whether this direction changes the row.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// The 9x9 Quoridor board. Pure geometry, no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board;

impl Board {
    /// Cells per side.
    pub const SIZE: i32 = 9;
    /// Wall anchors per side (one fewer than cells).
    pub const WALL_POSITIONS: i32 = 8;
    /// Walls each player starts with.
    pub const WALLS_PER_PLAYER: u8 = 10;

    /// Player 1 starts bottom-centre.
    pub const PLAYER1_START: Position = Position::from_static(8, 4);
    /// Player 2 starts top-centre.
    pub const PLAYER2_START: Position = Position::from_static(0, 4);
    /// Player 1 races to the top row.
    pub const PLAYER1_GOAL_ROW: i32 = 0;
    /// Player 2 races to the bottom row.
    pub const PLAYER2_GOAL_ROW: i32 = 8;

    /// Direction vectors (up, down, left, right).
    pub const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

    /// True iff both coordinates are in `[0, 8]`.
    pub fn is_valid_cell(row: i32, col: i32) -> bool {
        (0..Self::SIZE).contains(&row) && (0..Self::SIZE).contains(&col)
    }

    /// True iff both coordinates are in `[0, 7]`.
    pub fn is_valid_wall_slot(row: i32, col: i32) -> bool {
        (0..Self::WALL_POSITIONS).contains(&row) && (0..Self::WALL_POSITIONS).contains(&col)
    }

    /// Orthogonal neighbours inside the board, ignoring walls.
    pub fn adjacent_positions(pos: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| pos.step(dir))
            .collect()
    }

    /// Direction from `from` to an orthogonally adjacent `to`.
    pub fn direction_between(from: Position, to: Position) -> Option<Direction> {
        let delta = (to.row() - from.row(), to.col() - from.col());
        Direction::ALL.into_iter().find(|dir| dir.delta() == delta)
    }
}
