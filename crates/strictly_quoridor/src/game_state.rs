//! The game state machine.
//!
//! `GameState` owns both players and the wall manager and is the only
//! place where they are mutated. Every mutation goes through
//! [`GameState::move_pawn`], [`GameState::place_wall`] or
//! [`GameState::apply`], which validate first and leave the state untouched
//! on failure.

use crate::action::{Action, ActionOutcome, ActionResult};
use crate::error::ActionError;
use crate::player::{Player, PlayerId};
use crate::position::Position;
use crate::validator::MoveValidator;
use crate::wall::{Orientation, Wall};
use crate::wall_manager::WallManager;
use crate::pathfinder::Pathfinder;
use chrono::{DateTime, SubsecRound, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a game. Every status except `InProgress` is terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum GameStatus {
    /// Actions are accepted.
    #[serde(rename = "in_progress")]
    #[strum(serialize = "in_progress")]
    InProgress,
    /// Player 1 reached row 0.
    #[serde(rename = "player1_win")]
    #[strum(serialize = "player1_win")]
    Player1Win,
    /// Player 2 reached row 8.
    #[serde(rename = "player2_win")]
    #[strum(serialize = "player2_win")]
    Player2Win,
    /// Stopped from outside before anyone won.
    #[serde(rename = "abandoned")]
    #[strum(serialize = "abandoned")]
    Abandoned,
}

impl GameStatus {
    /// The winning status for `player`.
    pub fn won_by(player: PlayerId) -> Self {
        match player {
            PlayerId::One => GameStatus::Player1Win,
            PlayerId::Two => GameStatus::Player2Win,
        }
    }

    /// True unless the game is still in progress.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Who controls player 2.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum GameMode {
    /// Player 2 is driven by the AI.
    #[default]
    #[serde(rename = "vs_ai")]
    #[strum(serialize = "vs_ai")]
    VsAi,
    /// Two humans share the board.
    #[serde(rename = "local_2p")]
    #[strum(serialize = "local_2p")]
    Local2p,
}

/// Complete state of one Quoridor game.
///
/// `Clone` is a full deep copy: players and the wall manager are owned
/// values, so a clone can be mutated for lookahead without touching the
/// original.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) game_id: String,
    pub(crate) status: GameStatus,
    pub(crate) game_mode: GameMode,
    pub(crate) current_turn: PlayerId,
    pub(crate) turn_count: u32,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) player1: Player,
    pub(crate) player2: Player,
    pub(crate) wall_manager: WallManager,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl GameState {
    /// Starts a fresh game. A random id is generated when `game_id` is `None`.
    #[instrument(skip(player1_name, player2_name))]
    pub fn new(
        game_id: Option<String>,
        player1_name: impl Into<String>,
        player2_name: impl Into<String>,
        game_mode: GameMode,
    ) -> Self {
        let created = now();
        let game = Self {
            game_id: game_id.unwrap_or_else(generate_game_id),
            status: GameStatus::InProgress,
            game_mode,
            current_turn: PlayerId::One,
            turn_count: 0,
            winner: None,
            player1: Player::player1(player1_name),
            player2: Player::player2(player2_name),
            wall_manager: WallManager::new(),
            created_at: created,
            updated_at: created,
        };
        info!(game_id = %game.game_id, mode = %game_mode, "Created game");
        game
    }

    /// Game identifier.
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Who controls player 2.
    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    /// Player on turn.
    pub fn current_turn(&self) -> PlayerId {
        self.current_turn
    }

    /// Number of turn switches so far. A winning move does not count.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Winner, once the game is won.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Player 1.
    pub fn player1(&self) -> &Player {
        &self.player1
    }

    /// Player 2.
    pub fn player2(&self) -> &Player {
        &self.player2
    }

    /// Placed walls.
    pub fn wall_manager(&self) -> &WallManager {
        &self.wall_manager
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last committed action.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The player with the given id.
    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::One => &self.player1,
            PlayerId::Two => &self.player2,
        }
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        }
    }

    /// The player on turn.
    pub fn current_player(&self) -> &Player {
        self.player(self.current_turn)
    }

    /// The player waiting.
    pub fn opponent_player(&self) -> &Player {
        self.player(self.current_turn.opponent())
    }

    /// True once the game stopped accepting actions.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Cells the current player may move to.
    pub fn valid_pawn_moves(&self) -> Vec<Position> {
        MoveValidator::get_valid_pawn_moves(
            self.current_player(),
            self.opponent_player(),
            &self.wall_manager,
        )
    }

    /// Walls the current player may place.
    pub fn valid_wall_placements(&self) -> Vec<Wall> {
        MoveValidator::get_valid_wall_placements(
            self.current_player(),
            self.opponent_player(),
            &self.wall_manager,
        )
    }

    /// Shortest path length from `id`'s pawn to its goal row.
    pub fn distance_to_goal(&self, id: PlayerId) -> Option<usize> {
        let player = self.player(id);
        Pathfinder::shortest_distance(player.position(), player.goal_row(), &self.wall_manager)
    }

    /// Moves the current player's pawn to `(row, col)`.
    ///
    /// Reaching the goal row wins the game and keeps the turn with the
    /// winner. Any other legal move passes the turn.
    #[instrument(skip(self), fields(game_id = %self.game_id, player = %self.current_turn))]
    pub fn move_pawn(&mut self, row: i32, col: i32) -> ActionResult {
        self.try_move_pawn(row, col)
            .inspect_err(|err| warn!(%err, "Pawn move rejected"))
    }

    fn try_move_pawn(&mut self, row: i32, col: i32) -> ActionResult {
        self.ensure_in_progress()?;
        let target = Position::new(row, col)?;

        if !MoveValidator::is_valid_pawn_move(
            self.current_player(),
            self.opponent_player(),
            target,
            &self.wall_manager,
        ) {
            return Err(ActionError::InvalidMove);
        }

        let mover = self.current_turn;
        self.player_mut(mover).move_to(target);
        self.updated_at = now();

        let outcome = if self.player(mover).has_reached_goal() {
            self.winner = Some(mover);
            self.status = GameStatus::won_by(mover);
            info!(winner = %mover, turn_count = self.turn_count, "Game won");
            ActionOutcome::Won(mover)
        } else {
            self.switch_turn();
            debug!(%target, "Pawn moved");
            ActionOutcome::Moved
        };

        self.check_invariants();
        Ok(outcome)
    }

    /// Places a wall for the current player.
    ///
    /// `orientation` is `"horizontal"` or `"vertical"`. The turn always
    /// passes on success.
    #[instrument(skip(self), fields(game_id = %self.game_id, player = %self.current_turn))]
    pub fn place_wall(&mut self, row: i32, col: i32, orientation: &str) -> ActionResult {
        self.try_place_wall(row, col, || {
            Orientation::from_str(orientation).map_err(|_| {
                ActionError::InvalidWallParameters(format!("'{}' is not a valid orientation", orientation))
            })
        })
        .inspect_err(|err| warn!(%err, "Wall placement rejected"))
    }

    /// Places a wall with an already-parsed orientation.
    #[instrument(skip(self), fields(game_id = %self.game_id, player = %self.current_turn))]
    pub fn place_wall_oriented(&mut self, row: i32, col: i32, orientation: Orientation) -> ActionResult {
        self.try_place_wall(row, col, || Ok(orientation))
            .inspect_err(|err| warn!(%err, "Wall placement rejected"))
    }

    fn try_place_wall(
        &mut self,
        row: i32,
        col: i32,
        orientation: impl FnOnce() -> Result<Orientation, ActionError>,
    ) -> ActionResult {
        self.ensure_in_progress()?;
        if !self.current_player().has_walls() {
            return Err(ActionError::NoWallsRemaining);
        }
        let wall = Wall::new(row, col, orientation()?)?;

        if !MoveValidator::is_valid_wall_placement(
            &wall,
            self.current_player(),
            self.opponent_player(),
            &self.wall_manager,
        ) {
            return Err(ActionError::InvalidWallPlacement);
        }
        if !self.wall_manager.add_wall(wall) {
            return Err(ActionError::InvalidWallPlacement);
        }

        let placer = self.current_turn;
        self.player_mut(placer).use_wall();
        self.updated_at = now();
        self.switch_turn();
        debug!(%wall, "Wall placed");

        self.check_invariants();
        Ok(ActionOutcome::WallPlaced)
    }

    /// Applies an action for the current player.
    pub fn apply(&mut self, action: Action) -> ActionResult {
        match action {
            Action::Move { row, col } => self.move_pawn(row, col),
            Action::Wall {
                row,
                col,
                orientation,
            } => self.place_wall_oriented(row, col, orientation),
        }
    }

    /// Marks an in-progress game as abandoned.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn abandon(&mut self) -> Result<(), ActionError> {
        self.ensure_in_progress()?;
        self.status = GameStatus::Abandoned;
        self.updated_at = now();
        info!("Game abandoned");
        Ok(())
    }

    pub(crate) fn ensure_in_progress(&self) -> Result<(), ActionError> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            GameStatus::Player1Win | GameStatus::Player2Win => Err(ActionError::GameFinished),
            GameStatus::Abandoned => Err(ActionError::GameAbandoned),
        }
    }

    fn switch_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
        self.turn_count += 1;
    }

    fn check_invariants(&self) {
        #[cfg(debug_assertions)]
        if let Err(violations) = crate::invariants::check_game(self) {
            for violation in violations {
                warn!(invariant = %violation.description, "Invariant violated");
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(None, "Player", "AI", GameMode::VsAi)
    }
}

/// Current time at the precision snapshots store.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Random 128-bit id in the familiar 8-4-4-4-12 hex layout.
fn generate_game_id() -> String {
    let hex = format!("{:032x}", rand::random::<u128>());
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoundsError, ErrorCategory};

    fn fresh() -> GameState {
        GameState::new(Some("test".into()), "A", "B", GameMode::Local2p)
    }

    fn snapshot_of(game: &GameState) -> (PlayerId, u32, Position, Position, usize, u8, u8) {
        (
            game.current_turn(),
            game.turn_count(),
            game.player1().position(),
            game.player2().position(),
            game.wall_manager().len(),
            game.player1().walls_remaining(),
            game.player2().walls_remaining(),
        )
    }

    #[test]
    fn test_new_game_defaults() {
        let game = GameState::default();
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.game_mode(), GameMode::VsAi);
        assert_eq!(game.current_turn(), PlayerId::One);
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.winner(), None);
        assert_eq!(game.game_id().len(), 36);
        assert_eq!(game.player2().name(), "AI");
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_game_id(), generate_game_id());
    }

    #[test]
    fn test_single_step_passes_turn() {
        let mut game = fresh();
        assert_eq!(game.move_pawn(7, 4), Ok(ActionOutcome::Moved));
        assert_eq!(game.player1().position().to_tuple(), (7, 4));
        assert_eq!(game.current_turn(), PlayerId::Two);
        assert_eq!(game.turn_count(), 1);
    }

    #[test]
    fn test_two_cell_move_rejected() {
        let mut game = fresh();
        assert_eq!(game.move_pawn(6, 4), Err(ActionError::InvalidMove));
        assert_eq!(game.player1().position().to_tuple(), (8, 4));
        assert_eq!(game.turn_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_move() {
        let mut game = fresh();
        let err = game.move_pawn(9, 4).unwrap_err();
        assert_eq!(err, ActionError::OutOfBounds(BoundsError::Cell { row: 9, col: 4 }));
        assert_eq!(err.category(), ErrorCategory::Bounds);
    }

    #[test]
    fn test_win_keeps_turn_and_blocks_actions() {
        let mut game = fresh();
        game.player_mut(PlayerId::One)
            .move_to(Position::new(1, 4).unwrap());
        game.player_mut(PlayerId::Two)
            .move_to(Position::new(5, 0).unwrap());

        assert_eq!(game.move_pawn(0, 4), Ok(ActionOutcome::Won(PlayerId::One)));
        assert_eq!(game.status(), GameStatus::Player1Win);
        assert_eq!(game.winner(), Some(PlayerId::One));
        assert_eq!(game.current_turn(), PlayerId::One);
        assert_eq!(game.turn_count(), 0);

        let before = snapshot_of(&game);
        assert_eq!(game.move_pawn(0, 3), Err(ActionError::GameFinished));
        assert_eq!(game.place_wall(4, 4, "horizontal"), Err(ActionError::GameFinished));
        assert_eq!(snapshot_of(&game), before);
    }

    #[test]
    fn test_wall_placement_spends_wall_and_passes_turn() {
        let mut game = fresh();
        assert_eq!(game.place_wall(3, 3, "vertical"), Ok(ActionOutcome::WallPlaced));
        assert_eq!(game.player1().walls_remaining(), 9);
        assert_eq!(game.current_turn(), PlayerId::Two);
        assert_eq!(game.wall_manager().len(), 1);
    }

    #[test]
    fn test_wall_rejections_change_nothing() {
        let mut game = fresh();
        game.place_wall(4, 4, "horizontal").unwrap();
        let before = snapshot_of(&game);

        assert_eq!(game.place_wall(4, 4, "horizontal"), Err(ActionError::InvalidWallPlacement));
        assert_eq!(game.place_wall(4, 4, "vertical"), Err(ActionError::InvalidWallPlacement));
        assert_eq!(
            game.place_wall(8, 0, "vertical"),
            Err(ActionError::OutOfBounds(BoundsError::WallSlot { row: 8, col: 0 }))
        );
        let err = game.place_wall(1, 1, "diagonal").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Malformed);
        assert!(err.to_string().starts_with("Invalid wall parameters"));

        assert_eq!(snapshot_of(&game), before);
    }

    #[test]
    fn test_no_walls_remaining() {
        let mut game = fresh();
        for _ in 0..10 {
            game.player_mut(PlayerId::One).use_wall();
        }
        assert_eq!(game.place_wall(0, 0, "horizontal"), Err(ActionError::NoWallsRemaining));
        // Walls are checked before the orientation is parsed.
        assert_eq!(game.place_wall(0, 0, "sideways"), Err(ActionError::NoWallsRemaining));
    }

    #[test]
    fn test_apply_dispatches() {
        let mut game = fresh();
        assert_eq!(game.apply(Action::Move { row: 7, col: 4 }), Ok(ActionOutcome::Moved));
        assert_eq!(
            game.apply(Action::Wall {
                row: 6,
                col: 3,
                orientation: Orientation::Horizontal
            }),
            Ok(ActionOutcome::WallPlaced)
        );
        assert_eq!(game.player2().walls_remaining(), 9);
        assert_eq!(game.turn_count(), 2);
    }

    #[test]
    fn test_abandon_is_terminal() {
        let mut game = fresh();
        game.abandon().unwrap();
        assert!(game.is_finished());
        assert_eq!(game.move_pawn(7, 4), Err(ActionError::GameAbandoned));
        assert_eq!(game.abandon(), Err(ActionError::GameAbandoned));
    }

    #[test]
    fn test_clone_is_independent() {
        let game = fresh();
        let mut copy = game.clone();
        copy.move_pawn(7, 4).unwrap();
        copy.place_wall(0, 0, "horizontal").unwrap();
        assert_eq!(game.player1().position().to_tuple(), (8, 4));
        assert!(game.wall_manager().is_empty());
        assert_eq!(game.turn_count(), 0);
    }

    #[test]
    fn test_distance_to_goal() {
        let mut game = fresh();
        assert_eq!(game.distance_to_goal(PlayerId::One), Some(8));
        game.place_wall(7, 4, "horizontal").unwrap();
        assert_eq!(game.distance_to_goal(PlayerId::One), Some(9));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(GameStatus::Player1Win.to_string(), "player1_win");
        assert_eq!(GameStatus::from_str("in_progress"), Ok(GameStatus::InProgress));
        assert!(GameStatus::from_str("finished").is_err());
        assert_eq!(GameMode::Local2p.as_ref(), "local_2p");
    }
}
