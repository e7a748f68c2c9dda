//! Action log and replay.
//!
//! A history starts from a snapshot of the initial position, stored at
//! step `-1`. Every successful action is appended with the next step
//! number starting from 0, so the number of moves played is the number
//! of entries with a non-negative step.

use crate::action::{Action, ActionOutcome};
use crate::error::SnapshotError;
use crate::game_state::GameState;
use crate::player::PlayerId;
use crate::snapshot::GameSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Step number of the initial snapshot.
pub const INITIAL_STEP: i64 = -1;

/// One committed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 0 for the first action.
    pub step_no: i64,
    /// Who acted.
    pub player: PlayerId,
    /// What they did.
    pub action: Action,
    /// Success message the engine returned.
    pub message: String,
    /// When the action was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Initial snapshot plus the ordered list of actions since.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    initial: GameSnapshot,
    entries: Vec<HistoryEntry>,
}

impl GameHistory {
    /// Starts a history at `game`'s current position.
    pub fn new(game: &GameState) -> Self {
        Self {
            initial: game.to_snapshot(),
            entries: Vec::new(),
        }
    }

    /// Snapshot stored at step `-1`.
    pub fn initial_snapshot(&self) -> &GameSnapshot {
        &self.initial
    }

    /// Recorded actions, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of actions played.
    pub fn total_moves(&self) -> usize {
        self.entries.iter().filter(|entry| entry.step_no >= 0).count()
    }

    /// Step number of the latest entry, or `-1` when none.
    pub fn last_step(&self) -> i64 {
        self.entries.last().map_or(INITIAL_STEP, |entry| entry.step_no)
    }

    /// Appends a successful action and returns its entry.
    #[instrument(level = "debug", skip(self), fields(step = self.last_step() + 1))]
    pub fn record(&mut self, player: PlayerId, action: Action, outcome: ActionOutcome) -> &HistoryEntry {
        let entry = HistoryEntry {
            step_no: self.last_step() + 1,
            player,
            action,
            message: outcome.to_string(),
            timestamp: crate::game_state::now(),
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Rebuilds the position after `step`.
    ///
    /// `-1` gives the initial position. Each action is re-applied through
    /// [`GameState::apply`], so a tampered history fails here instead of
    /// producing an illegal position.
    #[instrument(skip(self))]
    pub fn replay_to(&self, step: i64) -> Result<GameState, SnapshotError> {
        if step < INITIAL_STEP || step > self.last_step() {
            return Err(SnapshotError::new(format!(
                "Step {} outside recorded range {}..={}",
                step,
                INITIAL_STEP,
                self.last_step()
            )));
        }

        let mut game = GameState::from_snapshot(self.initial.clone())?;
        for entry in self.entries.iter().take_while(|entry| entry.step_no <= step) {
            if game.current_turn() != entry.player {
                return Err(SnapshotError::new(format!(
                    "Step {} was recorded for {} but {} is on turn",
                    entry.step_no,
                    entry.player,
                    game.current_turn()
                )));
            }
            game.apply(entry.action).map_err(|err| {
                SnapshotError::new(format!(
                    "Step {} ({}) rejected on replay: {}",
                    entry.step_no, entry.action, err
                ))
            })?;
        }
        debug!(step, "Replayed history");
        Ok(game)
    }

    /// Rebuilds the latest position.
    pub fn replay_all(&self) -> Result<GameState, SnapshotError> {
        self.replay_to(self.last_step())
    }
}
