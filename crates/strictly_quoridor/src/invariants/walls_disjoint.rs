//! Wall disjointness: no two placed walls overlap or cross.

use super::Invariant;
use crate::game_state::GameState;

/// Invariant: every pair of placed walls has disjoint occupied slots.
pub struct WallsDisjointInvariant;

impl Invariant<GameState> for WallsDisjointInvariant {
    fn holds(game: &GameState) -> bool {
        let walls = game.wall_manager().walls();
        walls.iter().enumerate().all(|(i, wall)| {
            walls[i + 1..].iter().all(|other| !wall.intersects(other))
        })
    }

    fn description() -> &'static str {
        "Placed walls never overlap or cross"
    }
}
