//! Wall accounting: every placed wall came out of a player's supply.

use super::Invariant;
use crate::board::Board;
use crate::game_state::GameState;

/// Invariant: placed walls plus walls in hand equal the starting total,
/// and no player holds more than the per-player allowance.
pub struct WallBudgetInvariant;

impl Invariant<GameState> for WallBudgetInvariant {
    fn holds(game: &GameState) -> bool {
        let p1 = usize::from(game.player1().walls_remaining());
        let p2 = usize::from(game.player2().walls_remaining());
        let allowance = usize::from(Board::WALLS_PER_PLAYER);
        p1 <= allowance && p2 <= allowance && game.wall_manager().len() + p1 + p2 == 2 * allowance
    }

    fn description() -> &'static str {
        "Placed walls account for every wall spent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameMode;

    #[test]
    fn test_holds_as_walls_are_spent() {
        let mut game = GameState::new(None, "A", "B", GameMode::Local2p);
        assert!(WallBudgetInvariant::holds(&game));
        game.place_wall(6, 6, "vertical").unwrap();
        game.place_wall(1, 1, "horizontal").unwrap();
        assert_eq!(game.player1().walls_remaining(), 9);
        assert_eq!(game.player2().walls_remaining(), 9);
        assert!(WallBudgetInvariant::holds(&game));
    }
}
