//! First-class action types for Quoridor.
//!
//! An action is the player's intent. It is validated and applied by
//! [`GameState::apply`](crate::GameState::apply), logged in history and
//! replayed from there.

use crate::error::ActionError;
use crate::player::PlayerId;
use crate::position::Position;
use crate::wall::{Orientation, Wall};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One turn's worth of intent: move the pawn or place a wall.
///
/// Coordinates are unchecked so that a malformed request can still be
/// represented and rejected by the engine with a bounds error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Move the current player's pawn to `(row, col)`.
    #[display("move to ({row}, {col})")]
    Move {
        /// Target row.
        row: i32,
        /// Target column.
        col: i32,
    },
    /// Place a wall anchored at `(row, col)`.
    #[display("{orientation} wall at ({row}, {col})")]
    Wall {
        /// Anchor row.
        row: i32,
        /// Anchor column.
        col: i32,
        /// Wall orientation.
        orientation: Orientation,
    },
}

impl Action {
    /// Move action targeting `position`.
    pub fn move_to(position: Position) -> Self {
        Action::Move {
            row: position.row(),
            col: position.col(),
        }
    }

    /// Wall action placing `wall`.
    pub fn place(wall: Wall) -> Self {
        Action::Wall {
            row: wall.row(),
            col: wall.col(),
            orientation: wall.orientation(),
        }
    }

    /// True for pawn moves.
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }
}

impl From<Position> for Action {
    fn from(position: Position) -> Self {
        Action::move_to(position)
    }
}

impl From<Wall> for Action {
    fn from(wall: Wall) -> Self {
        Action::place(wall)
    }
}

/// What a successful action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ActionOutcome {
    /// The pawn moved and the turn passed.
    #[display("Pawn moved successfully")]
    Moved,
    /// The pawn reached its goal row. The turn does not pass.
    #[display("{_0} wins!")]
    Won(PlayerId),
    /// A wall was placed and the turn passed.
    #[display("Wall placed successfully")]
    WallPlaced,
}

/// Result of a mutating call on a game.
pub type ActionResult = Result<ActionOutcome, ActionError>;

/// Folds a result into a `(success, message)` pair for transport layers.
pub fn action_report(result: &ActionResult) -> (bool, String) {
    match result {
        Ok(outcome) => (true, outcome.to_string()),
        Err(err) => (false, err.to_string()),
    }
}
