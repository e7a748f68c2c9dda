//! The two pawns never share a cell.

use super::Invariant;
use crate::game_state::GameState;

/// Invariant: pawns occupy distinct cells.
pub struct PawnsApartInvariant;

impl Invariant<GameState> for PawnsApartInvariant {
    fn holds(game: &GameState) -> bool {
        game.player1().position() != game.player2().position()
    }

    fn description() -> &'static str {
        "Pawns occupy distinct cells"
    }
}
