//! Strictly Quoridor - a rules engine for two-player Quoridor
//!
//! Pawns race across a 9x9 board while players drop walls in each other's
//! way. The engine enforces every rule, including the one that makes the
//! game interesting: no wall may ever cut a player off from their goal.
//!
//! # Architecture
//!
//! - **Geometry**: [`Position`], [`Board`], [`Wall`]
//! - **Walls**: [`WallManager`] keeps severed edges and occupied slots
//! - **Reachability**: [`Pathfinder`] runs BFS over the wall-cut grid
//! - **Rules**: [`MoveValidator`] enumerates legal pawn moves and walls
//! - **State machine**: [`GameState`] applies [`Action`]s and tracks the winner
//! - **Persistence boundary**: [`GameSnapshot`], [`GameSerializer`], [`GameHistory`]
//! - **Opponent**: [`SimpleAi`] configured by [`AiConfig`]
//! - **Sessions**: [`SessionManager`] serializes access to live games
//!
//! # Example
//!
//! ```
//! use strictly_quoridor::{ActionOutcome, GameMode, GameState, PlayerId};
//!
//! let mut game = GameState::new(None, "Alice", "Bob", GameMode::Local2p);
//! assert_eq!(game.move_pawn(7, 4), Ok(ActionOutcome::Moved));
//! assert_eq!(game.current_turn(), PlayerId::Two);
//! assert!(game.move_pawn(3, 3).is_err());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ai;
mod board;
mod error;
mod game_state;
mod history;
pub mod invariants;
mod pathfinder;
mod player;
mod position;
mod session;
mod snapshot;
mod validator;
mod wall;
mod wall_manager;

// Crate-level exports - Geometry
pub use board::{Board, Direction};
pub use position::{Position, PositionRecord};
pub use wall::{Edge, Orientation, SlotKind, Wall, WallRecord, WallSlot};

// Crate-level exports - Rules engine
pub use pathfinder::Pathfinder;
pub use player::{Player, PlayerId};
pub use validator::MoveValidator;
pub use wall_manager::WallManager;

// Crate-level exports - State machine
pub use action::{Action, ActionOutcome, ActionResult, action_report};
pub use game_state::{GameMode, GameState, GameStatus};

// Crate-level exports - Errors
pub use error::{ActionError, BoundsError, ConfigError, ErrorCategory, SessionError, SnapshotError};

// Crate-level exports - Serialization and history
pub use history::{GameHistory, HistoryEntry, INITIAL_STEP};
pub use snapshot::{
    GameSerializer, GameSnapshot, LEGACY_FINISHED_STATUS, PlayerSnapshot, PlayersSnapshot,
    format_timestamp, parse_timestamp,
};

// Crate-level exports - AI and sessions
pub use ai::{AiConfig, Difficulty, SimpleAi};
pub use session::{GameId, GameSession, SessionManager, ValidMoves};
