//! Per-player state.

use crate::board::Board;
use crate::position::Position;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which of the two seats a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(try_from = "u8", into = "u8")]
#[display("Player {}", self.number())]
pub enum PlayerId {
    /// Starts at the bottom, moves first.
    One,
    /// Starts at the top.
    Two,
}

impl PlayerId {
    /// Returns the other player.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// Parses 1 or 2.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// The row this player must reach.
    pub fn goal_row(self) -> i32 {
        match self {
            PlayerId::One => Board::PLAYER1_GOAL_ROW,
            PlayerId::Two => Board::PLAYER2_GOAL_ROW,
        }
    }

    /// Where this player's pawn starts.
    pub fn start_position(self) -> Position {
        match self {
            PlayerId::One => Board::PLAYER1_START,
            PlayerId::Two => Board::PLAYER2_START,
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        PlayerId::from_number(number).ok_or_else(|| format!("player id must be 1 or 2, got {}", number))
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.number()
    }
}

/// A player's pawn, name and wall supply.
///
/// The goal row is fixed by the player's id and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    position: Position,
    walls_remaining: u8,
}

impl Player {
    /// Creates a player at an arbitrary position with a full wall supply.
    pub fn new(id: PlayerId, name: impl Into<String>, position: Position) -> Self {
        Self::with_walls(id, name, position, Board::WALLS_PER_PLAYER)
    }

    /// Creates a player with an explicit wall count of at most 10.
    pub fn with_walls(
        id: PlayerId,
        name: impl Into<String>,
        position: Position,
        walls_remaining: u8,
    ) -> Self {
        debug_assert!(
            walls_remaining <= Board::WALLS_PER_PLAYER,
            "wall count {} exceeds allowance",
            walls_remaining
        );
        Self {
            id,
            name: name.into(),
            position,
            walls_remaining,
        }
    }

    /// Player 1 at the bottom-centre start cell.
    pub fn player1(name: impl Into<String>) -> Self {
        Self::new(PlayerId::One, name, PlayerId::One.start_position())
    }

    /// Player 2 at the top-centre start cell.
    pub fn player2(name: impl Into<String>) -> Self {
        Self::new(PlayerId::Two, name, PlayerId::Two.start_position())
    }

    /// Seat.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current cell.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Walls left to place.
    pub fn walls_remaining(&self) -> u8 {
        self.walls_remaining
    }

    /// Target row.
    pub fn goal_row(&self) -> i32 {
        self.id.goal_row()
    }

    /// True if at least one wall is left.
    pub fn has_walls(&self) -> bool {
        self.walls_remaining > 0
    }

    /// True if the pawn stands on the goal row.
    pub fn has_reached_goal(&self) -> bool {
        self.position.row() == self.goal_row()
    }

    pub(crate) fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    /// Spends one wall. Returns false if none were left.
    pub(crate) fn use_wall(&mut self) -> bool {
        if self.walls_remaining == 0 {
            return false;
        }
        self.walls_remaining -= 1;
        true
    }
}
