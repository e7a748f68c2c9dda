//! First-class invariants for Quoridor.
//!
//! Invariants are logical properties that must hold for every reachable
//! [`GameState`]. They are checked after each committed action in debug
//! builds and can be tested independently.

use crate::game_state::GameState;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns every violated invariant, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

pub mod goals_reachable;
pub mod pawns_apart;
pub mod wall_budget;
pub mod walls_disjoint;

pub use goals_reachable::GoalsReachableInvariant;
pub use pawns_apart::PawnsApartInvariant;
pub use wall_budget::WallBudgetInvariant;
pub use walls_disjoint::WallsDisjointInvariant;

/// All Quoridor invariants as a composable set.
pub type QuoridorInvariants = (
    WallsDisjointInvariant,
    GoalsReachableInvariant,
    WallBudgetInvariant,
    PawnsApartInvariant,
);

/// Checks [`QuoridorInvariants`] against `game`.
pub fn check_game(game: &GameState) -> Result<(), Vec<InvariantViolation>> {
    QuoridorInvariants::check_all(game)
}
