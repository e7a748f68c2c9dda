//! In-memory game sessions.
//!
//! A [`SessionManager`] is a cheap-to-clone handle over every live game.
//! All access goes through one mutex, so at most one action per manager is
//! in flight and a `GameState` is never touched by two threads at once.

use crate::action::{Action, ActionOutcome};
use crate::ai::{AiConfig, SimpleAi};
use crate::error::SessionError;
use crate::game_state::{GameMode, GameState};
use crate::history::GameHistory;
use crate::player::PlayerId;
use crate::position::Position;
use crate::wall::Wall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game.
pub type GameId = String;

/// A live game with its log and, in `vs_ai` mode, its AI.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Current state.
    pub game: GameState,
    /// Every action since creation.
    pub history: GameHistory,
    /// Present in `vs_ai` mode.
    pub ai: Option<SimpleAi>,
}

impl GameSession {
    fn new(game: GameState, ai: Option<SimpleAi>) -> Self {
        Self {
            history: GameHistory::new(&game),
            game,
            ai,
        }
    }

    /// Applies `action` for the player on turn and logs it on success.
    #[instrument(skip(self), fields(game_id = %self.game.game_id()))]
    fn play(&mut self, action: Action) -> Result<ActionOutcome, SessionError> {
        let player = self.game.current_turn();
        let outcome = self.game.apply(action)?;
        self.history.record(player, action, outcome);
        info!(%player, %action, %outcome, "Action committed");
        Ok(outcome)
    }
}

/// Legal options for the player on turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidMoves {
    /// Who is on turn.
    pub player: PlayerId,
    /// Cells the pawn may move to.
    pub pawn_moves: Vec<Position>,
    /// Walls that may be placed.
    pub walls: Vec<Wall>,
}

/// Manages all game sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<GameId, GameSession>>>,
    ai_config: AiConfig,
    ai_seed: Option<u64>,
}

impl SessionManager {
    /// Creates a manager whose AIs use the default config.
    #[instrument]
    pub fn new() -> Self {
        Self::with_ai_config(AiConfig::default())
    }

    /// Creates a manager whose AIs use `ai_config`.
    #[instrument]
    pub fn with_ai_config(ai_config: AiConfig) -> Self {
        info!(difficulty = %ai_config.difficulty(), "Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ai_config,
            ai_seed: None,
        }
    }

    /// Seeds every AI created from now on, for reproducible games.
    pub fn with_ai_seed(mut self, seed: u64) -> Self {
        self.ai_seed = Some(seed);
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GameId, GameSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_session<T>(
        &self,
        game_id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(game_id).ok_or_else(|| {
            debug!(game_id, "Game not found");
            SessionError::NotFound(game_id.to_string())
        })?;
        f(session)
    }

    /// Starts a new game and returns its id.
    #[instrument(skip(self, player1_name, player2_name))]
    pub fn create_game(
        &self,
        player1_name: impl Into<String>,
        player2_name: impl Into<String>,
        game_mode: GameMode,
    ) -> GameId {
        let game = GameState::new(None, player1_name, player2_name, game_mode);
        let game_id = game.game_id().to_string();
        let ai = (game_mode == GameMode::VsAi).then(|| match self.ai_seed {
            Some(seed) => SimpleAi::with_seed(self.ai_config, seed),
            None => SimpleAi::new(self.ai_config),
        });

        self.lock().insert(game_id.clone(), GameSession::new(game, ai));
        info!(%game_id, "Created session");
        game_id
    }

    /// A copy of the current state.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: &str) -> Result<GameState, SessionError> {
        self.with_session(game_id, |session| Ok(session.game.clone()))
    }

    /// Moves the current player's pawn.
    #[instrument(skip(self))]
    pub fn move_pawn(&self, game_id: &str, row: i32, col: i32) -> Result<ActionOutcome, SessionError> {
        self.with_session(game_id, |session| session.play(Action::Move { row, col }))
    }

    /// Places a wall for the current player.
    #[instrument(skip(self))]
    pub fn place_wall(
        &self,
        game_id: &str,
        row: i32,
        col: i32,
        orientation: &str,
    ) -> Result<ActionOutcome, SessionError> {
        self.with_session(game_id, |session| {
            let player = session.game.current_turn();
            let outcome = session.game.place_wall(row, col, orientation)?;
            if let Some(&wall) = session.game.wall_manager().walls().last() {
                session.history.record(player, Action::place(wall), outcome);
                info!(%player, %wall, "Action committed");
            }
            Ok(outcome)
        })
    }

    /// Lets the AI play for player 2.
    ///
    /// Only valid in `vs_ai` mode while player 2 is on turn.
    #[instrument(skip(self))]
    pub fn ai_move(&self, game_id: &str) -> Result<(Action, ActionOutcome), SessionError> {
        self.with_session(game_id, |session| {
            session.game.ensure_in_progress()?;
            if session.game.current_turn() != PlayerId::Two {
                return Err(SessionError::NotAiTurn);
            }
            let ai = session.ai.as_mut().ok_or(SessionError::NotAiTurn)?;
            let Some(action) = ai.choose_action(&session.game) else {
                warn!("AI found no legal action");
                return Err(SessionError::NoAiMove);
            };
            let outcome = session.play(action)?;
            Ok((action, outcome))
        })
    }

    /// Legal pawn moves and walls for the player on turn.
    #[instrument(skip(self))]
    pub fn valid_moves(&self, game_id: &str) -> Result<ValidMoves, SessionError> {
        self.with_session(game_id, |session| {
            let game = &session.game;
            let (pawn_moves, walls) = if game.is_finished() {
                (Vec::new(), Vec::new())
            } else {
                (game.valid_pawn_moves(), game.valid_wall_placements())
            };
            Ok(ValidMoves {
                player: game.current_turn(),
                pawn_moves,
                walls,
            })
        })
    }

    /// Stops an in-progress game.
    #[instrument(skip(self))]
    pub fn abandon_game(&self, game_id: &str) -> Result<(), SessionError> {
        self.with_session(game_id, |session| Ok(session.game.abandon()?))
    }

    /// Drops a game entirely.
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: &str) -> Result<(), SessionError> {
        match self.lock().remove(game_id) {
            Some(_) => {
                info!(game_id, "Deleted session");
                Ok(())
            }
            None => Err(SessionError::NotFound(game_id.to_string())),
        }
    }

    /// A copy of the game's action log.
    #[instrument(skip(self))]
    pub fn history(&self, game_id: &str) -> Result<GameHistory, SessionError> {
        self.with_session(game_id, |session| Ok(session.history.clone()))
    }

    /// Ids of all live games, sorted.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.lock().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed games");
        ids
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_game() {
        let manager = SessionManager::new();
        assert_eq!(
            manager.move_pawn("missing", 7, 4),
            Err(SessionError::NotFound("missing".into()))
        );
        assert!(manager.delete_game("missing").is_err());
    }

    #[test]
    fn test_clones_share_sessions() {
        let manager = SessionManager::new();
        let other = manager.clone();
        let id = manager.create_game("A", "B", GameMode::Local2p);
        assert_eq!(other.list_games(), vec![id.clone()]);
        other.move_pawn(&id, 7, 4).unwrap();
        assert_eq!(manager.get_game(&id).unwrap().turn_count(), 1);
    }

    #[test]
    fn test_local_game_has_no_ai() {
        let manager = SessionManager::new();
        let id = manager.create_game("A", "B", GameMode::Local2p);
        manager.move_pawn(&id, 7, 4).unwrap();
        assert_eq!(manager.ai_move(&id), Err(SessionError::NotAiTurn));
    }
}
