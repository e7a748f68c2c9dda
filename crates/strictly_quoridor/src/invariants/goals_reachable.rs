//! No full block: both players can always reach their goal row.

use super::Invariant;
use crate::game_state::GameState;
use crate::pathfinder::Pathfinder;

/// Invariant: each pawn has a path to its own goal row.
pub struct GoalsReachableInvariant;

impl Invariant<GameState> for GoalsReachableInvariant {
    fn holds(game: &GameState) -> bool {
        [game.player1(), game.player2()].into_iter().all(|player| {
            Pathfinder::has_path_to_goal(player.position(), player.goal_row(), game.wall_manager())
        })
    }

    fn description() -> &'static str {
        "Both players can reach their goal row"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameMode;
    use crate::wall::{Orientation, Wall};

    #[test]
    fn test_holds_for_new_game() {
        let game = GameState::new(None, "A", "B", GameMode::Local2p);
        assert!(GoalsReachableInvariant::holds(&game));
    }

    #[test]
    fn test_detects_forced_seal() {
        let mut game = GameState::new(None, "A", "B", GameMode::Local2p);
        // Box (0,4)-(1,4) in by writing walls past the validator.
        for wall in [
            Wall::new(0, 3, Orientation::Vertical).unwrap(),
            Wall::new(0, 4, Orientation::Vertical).unwrap(),
            Wall::new(1, 3, Orientation::Horizontal).unwrap(),
        ] {
            assert!(game.wall_manager.add_wall(wall));
        }
        assert!(!GoalsReachableInvariant::holds(&game));
    }
}
