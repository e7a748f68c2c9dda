//! Heuristic opponent.
//!
//! Decides from the engine's public queries only: legal moves, legal walls
//! and BFS distances. The chosen [`Action`] is applied by the caller through
//! [`GameState::apply`], so the AI can never make an illegal move.

use super::config::AiConfig;
use crate::action::Action;
use crate::game_state::GameState;
use crate::pathfinder::Pathfinder;
use crate::position::Position;
use crate::wall::Wall;
use crate::wall_manager::WallManager;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, trace};

/// Extra chance of walling when the opponent is ahead in the race.
const BEHIND_WALL_BONUS: f64 = 0.2;

/// Distance-driven AI with configurable aggression and noise.
#[derive(Debug, Clone)]
pub struct SimpleAi {
    config: AiConfig,
    rng: StdRng,
}

impl SimpleAi {
    /// Creates an AI seeded from the operating system.
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates an AI whose choices are reproducible for a given seed.
    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Tuning parameters.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Picks an action for the player on turn, or `None` when the game is
    /// over or nothing is legal.
    #[instrument(skip_all, fields(game_id = %game.game_id(), player = %game.current_turn()))]
    pub fn choose_action(&mut self, game: &GameState) -> Option<Action> {
        if game.is_finished() {
            return None;
        }

        let moves = game.valid_pawn_moves();
        let walls = if game.current_player().has_walls() {
            game.valid_wall_placements()
        } else {
            Vec::new()
        };
        if moves.is_empty() && walls.is_empty() {
            return None;
        }

        if self.rng.gen_bool(*self.config.randomness()) {
            debug!("Playing a random action");
            return self.random_action(&moves, &walls);
        }
        self.strategic_action(game, &moves, &walls)
    }

    fn strategic_action(&mut self, game: &GameState, moves: &[Position], walls: &[Wall]) -> Option<Action> {
        let me = game.current_player();
        let opponent = game.opponent_player();
        let my_distance = game.distance_to_goal(me.id()).unwrap_or(usize::MAX);
        let their_distance = game.distance_to_goal(opponent.id()).unwrap_or(usize::MAX);
        trace!(my_distance, their_distance, "Race distances");

        if my_distance == 1
            && let Some(target) = Self::step_to_goal(moves, me.goal_row())
        {
            return Some(Action::move_to(target));
        }

        let wall_probability = *self.config.wall_probability();
        let behind = their_distance < my_distance;
        if !walls.is_empty() && behind && self.rng.gen_bool((wall_probability + BEHIND_WALL_BONUS).min(1.0))
            && let Some(wall) = self.find_blocking_wall(game, walls)
        {
            debug!(%wall, "Blocking while behind");
            return Some(Action::place(wall));
        }
        if !walls.is_empty() && self.rng.gen_bool(wall_probability)
            && let Some(wall) = self.find_blocking_wall(game, walls)
        {
            debug!(%wall, "Opportunistic block");
            return Some(Action::place(wall));
        }

        match self.best_move(moves, me.goal_row(), game.wall_manager()) {
            Some(target) => Some(Action::move_to(target)),
            None => walls.choose(&mut self.rng).copied().map(Action::place),
        }
    }

    /// A move onto the goal row, or else the one that ends closest to it.
    fn step_to_goal(moves: &[Position], goal_row: i32) -> Option<Position> {
        moves
            .iter()
            .find(|target| target.row() == goal_row)
            .or_else(|| moves.iter().min_by_key(|target| (target.row() - goal_row).abs()))
            .copied()
    }

    /// The move with the shortest remaining path; ties broken at random.
    fn best_move(&mut self, moves: &[Position], goal_row: i32, wall_manager: &WallManager) -> Option<Position> {
        let scored: Vec<(Position, usize)> = moves
            .iter()
            .map(|&target| {
                let distance = Pathfinder::shortest_distance(target, goal_row, wall_manager).unwrap_or(usize::MAX);
                (target, distance)
            })
            .collect();
        let best = scored.iter().map(|&(_, distance)| distance).min()?;
        let candidates: Vec<Position> = scored
            .into_iter()
            .filter(|&(_, distance)| distance == best)
            .map(|(target, _)| target)
            .collect();
        candidates.choose(&mut self.rng).copied()
    }

    /// Samples legal walls and returns one that lengthens the opponent's
    /// path the most, if any lengthens it at all.
    fn find_blocking_wall(&mut self, game: &GameState, walls: &[Wall]) -> Option<Wall> {
        let opponent = game.opponent_player();
        let wall_manager = game.wall_manager();
        let current = Pathfinder::shortest_distance(opponent.position(), opponent.goal_row(), wall_manager)?;

        let sample_size = (*self.config.wall_sample_size()).min(walls.len());
        let mut best_increase = 0;
        let mut best_walls = Vec::new();

        for &wall in walls.choose_multiple(&mut self.rng, sample_size) {
            let Some(speculative) = wall_manager.with_wall(wall) else {
                continue;
            };
            let Some(distance) = Pathfinder::shortest_distance(opponent.position(), opponent.goal_row(), &speculative)
            else {
                continue;
            };
            let increase = distance.saturating_sub(current);
            if increase > best_increase {
                best_increase = increase;
                best_walls.clear();
                best_walls.push(wall);
            } else if increase == best_increase && increase > 0 {
                best_walls.push(wall);
            }
        }

        trace!(best_increase, candidates = best_walls.len(), "Evaluated blocking walls");
        best_walls.choose(&mut self.rng).copied()
    }

    fn random_action(&mut self, moves: &[Position], walls: &[Wall]) -> Option<Action> {
        let pool = (*self.config.random_wall_pool()).min(walls.len());
        let actions: Vec<Action> = moves
            .iter()
            .copied()
            .map(Action::move_to)
            .chain(walls[..pool].iter().copied().map(Action::place))
            .collect();
        actions.choose(&mut self.rng).copied()
    }
}
