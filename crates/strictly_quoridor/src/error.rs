//! Error types for the Quoridor rules engine.
//!
//! Rule violations are ordinary return values. Only malformed external
//! input (snapshots, config files, unknown sessions) surfaces as a
//! located error type.

use derive_more::{Display, Error};
use tracing::instrument;

/// A coordinate fell outside the cell grid or the wall grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BoundsError {
    /// Cell coordinate outside `[0, 8]`.
    #[display("Invalid position: ({row}, {col})")]
    Cell {
        /// Requested row.
        row: i32,
        /// Requested column.
        col: i32,
    },
    /// Wall anchor outside `[0, 7]`.
    #[display("Invalid wall position: ({row}, {col})")]
    WallSlot {
        /// Requested row.
        row: i32,
        /// Requested column.
        col: i32,
    },
}

impl std::error::Error for BoundsError {}

/// Coarse classification of an [`ActionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A coordinate was out of range.
    Bounds,
    /// A well-formed action broke a game rule.
    Rule,
    /// The game no longer accepts actions.
    Terminal,
    /// The action could not be parsed.
    Malformed,
}

/// Why a `move_pawn` / `place_wall` call was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ActionError {
    /// A player already reached their goal row.
    #[display("Game is already finished")]
    GameFinished,

    /// The game was abandoned.
    #[display("Game was abandoned")]
    GameAbandoned,

    /// Target cell or wall anchor out of range.
    #[display("{_0}")]
    OutOfBounds(BoundsError),

    /// The pawn cannot reach the target this turn.
    #[display("Invalid move")]
    InvalidMove,

    /// The current player has no walls left.
    #[display("No walls remaining")]
    NoWallsRemaining,

    /// Orientation or coordinates could not be understood.
    #[display("Invalid wall parameters: {_0}")]
    InvalidWallParameters(String),

    /// The wall overlaps another wall or seals a player off.
    #[display("Invalid wall placement")]
    InvalidWallPlacement,
}

impl ActionError {
    /// Returns the category callers use to pick a response.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ActionError::GameFinished | ActionError::GameAbandoned => ErrorCategory::Terminal,
            ActionError::OutOfBounds(_) => ErrorCategory::Bounds,
            ActionError::InvalidWallParameters(_) => ErrorCategory::Malformed,
            ActionError::InvalidMove
            | ActionError::NoWallsRemaining
            | ActionError::InvalidWallPlacement => ErrorCategory::Rule,
        }
    }
}

impl std::error::Error for ActionError {}

impl From<BoundsError> for ActionError {
    fn from(err: BoundsError) -> Self {
        ActionError::OutOfBounds(err)
    }
}

/// Serialized game state could not be restored.
#[derive(Debug, Clone, Display, Error)]
#[display("Snapshot error: {} at {}:{}", message, file, line)]
pub struct SnapshotError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SnapshotError {
    /// Creates a new snapshot error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for SnapshotError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("IO error: {}", err))
    }
}

impl From<BoundsError> for SnapshotError {
    #[track_caller]
    fn from(err: BoundsError) -> Self {
        Self::new(err.to_string())
    }
}

/// AI configuration could not be loaded.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A session-level request could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// No game with this id.
    #[display("Game not found: {_0}")]
    NotFound(String),

    /// The engine rejected the action.
    #[display("{_0}")]
    Action(ActionError),

    /// `ai_move` was requested when the AI is not on turn.
    #[display("Not AI's turn")]
    NotAiTurn,

    /// The AI found nothing legal to do.
    #[display("AI could not find a valid move")]
    NoAiMove,
}

impl std::error::Error for SessionError {}

impl From<ActionError> for SessionError {
    fn from(err: ActionError) -> Self {
        SessionError::Action(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_messages() {
        let cell = BoundsError::Cell { row: 9, col: 0 };
        assert_eq!(cell.to_string(), "Invalid position: (9, 0)");
        let wall = BoundsError::WallSlot { row: -1, col: 3 };
        assert_eq!(wall.to_string(), "Invalid wall position: (-1, 3)");
    }

    #[test]
    fn test_action_error_categories() {
        assert_eq!(ActionError::GameFinished.category(), ErrorCategory::Terminal);
        assert_eq!(ActionError::GameAbandoned.category(), ErrorCategory::Terminal);
        assert_eq!(ActionError::InvalidMove.category(), ErrorCategory::Rule);
        assert_eq!(
            ActionError::InvalidWallParameters("diagonal".into()).category(),
            ErrorCategory::Malformed
        );
        let bounds: ActionError = BoundsError::Cell { row: 0, col: 9 }.into();
        assert_eq!(bounds.category(), ErrorCategory::Bounds);
        assert_eq!(bounds.to_string(), "Invalid position: (0, 9)");
    }

    #[test]
    fn test_snapshot_error_tracks_location() {
        let err = SnapshotError::new("bad status");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("bad status"));
    }
}
