//! Legality rules for pawn moves and wall placements.
//!
//! The validator is stateless: every query takes the two players and the
//! wall manager explicitly and never mutates them.

use crate::board::Direction;
use crate::pathfinder::Pathfinder;
use crate::player::Player;
use crate::position::Position;
use crate::wall::{Edge, Wall};
use crate::wall_manager::WallManager;
use std::collections::HashSet;
use tracing::{debug, instrument, trace};

/// Rules layer combining board geometry, walls and reachability.
#[derive(Debug, Clone, Copy)]
pub struct MoveValidator;

impl MoveValidator {
    /// Every cell `player` may move its pawn to this turn.
    ///
    /// Stepping onto the opponent turns into a jump: straight over when
    /// the cell behind is open, otherwise diagonally to either side.
    #[instrument(level = "trace", skip_all, fields(player = %player.id(), from = %player.position()))]
    pub fn get_valid_pawn_moves(
        player: &Player,
        opponent: &Player,
        wall_manager: &WallManager,
    ) -> Vec<Position> {
        let current = player.position();
        let mut moves = Vec::with_capacity(5);

        for direction in Direction::ALL {
            let Some(target) = current.step(direction) else {
                continue;
            };
            if wall_manager.is_move_blocked(current, target) {
                continue;
            }
            if target == opponent.position() {
                moves.extend(Self::jump_moves(target, direction, wall_manager));
            } else {
                moves.push(target);
            }
        }

        trace!(count = moves.len(), "Enumerated pawn moves");
        moves
    }

    /// Landing cells when jumping over the opponent standing at `opponent`.
    fn jump_moves(opponent: Position, direction: Direction, wall_manager: &WallManager) -> Vec<Position> {
        if let Some(straight) = opponent.step(direction)
            && !wall_manager.is_move_blocked(opponent, straight)
        {
            return vec![straight];
        }

        direction
            .perpendicular()
            .into_iter()
            .filter_map(|side| opponent.step(side))
            .filter(|&diagonal| !wall_manager.is_move_blocked(opponent, diagonal))
            .collect()
    }

    /// True if `target` is among [`Self::get_valid_pawn_moves`].
    pub fn is_valid_pawn_move(
        player: &Player,
        opponent: &Player,
        target: Position,
        wall_manager: &WallManager,
    ) -> bool {
        Self::get_valid_pawn_moves(player, opponent, wall_manager).contains(&target)
    }

    /// Every wall `player` may place this turn.
    ///
    /// Each of the 128 candidates needs a reachability check for both
    /// players. A candidate that cuts neither player's current shortest
    /// path leaves that path intact, so only candidates touching one of
    /// the two paths pay for a BFS.
    #[instrument(skip_all, fields(player = %player.id(), placed = wall_manager.len()))]
    pub fn get_valid_wall_placements(
        player: &Player,
        opponent: &Player,
        wall_manager: &WallManager,
    ) -> Vec<Wall> {
        if !player.has_walls() {
            return Vec::new();
        }

        let guarded = GuardedEdges::new(player, opponent, wall_manager);
        let walls: Vec<Wall> = Wall::all()
            .filter(|wall| wall_manager.can_place_wall(wall))
            .filter(|wall| match &guarded {
                Some(edges) if !edges.cut_by(wall) => true,
                _ => Self::keeps_paths_open(wall, player, opponent, wall_manager),
            })
            .collect();

        debug!(count = walls.len(), "Enumerated wall placements");
        walls
    }

    /// True if `player` may place `wall` now.
    ///
    /// Rejects when the player has no walls, when the wall overlaps or
    /// crosses a placed wall, or when it would leave either player without
    /// a path to their goal row.
    #[instrument(level = "trace", skip(player, opponent, wall_manager))]
    pub fn is_valid_wall_placement(
        wall: &Wall,
        player: &Player,
        opponent: &Player,
        wall_manager: &WallManager,
    ) -> bool {
        if !player.has_walls() {
            return false;
        }
        if !wall_manager.can_place_wall(wall) {
            return false;
        }
        Self::keeps_paths_open(wall, player, opponent, wall_manager)
    }

    fn keeps_paths_open(
        wall: &Wall,
        player: &Player,
        opponent: &Player,
        wall_manager: &WallManager,
    ) -> bool {
        let Some(speculative) = wall_manager.with_wall(*wall) else {
            return false;
        };
        Pathfinder::can_place_wall_safely(
            &speculative,
            player.position(),
            player.goal_row(),
            opponent.position(),
            opponent.goal_row(),
        )
    }
}

/// Edges on both players' current shortest paths.
struct GuardedEdges(HashSet<Edge>);

impl GuardedEdges {
    /// `None` when either player is already cut off, in which case no
    /// shortcut is sound.
    fn new(player: &Player, opponent: &Player, wall_manager: &WallManager) -> Option<Self> {
        let mut edges = HashSet::new();
        for someone in [player, opponent] {
            let path = Pathfinder::find_shortest_path(someone.position(), someone.goal_row(), wall_manager)?;
            edges.extend(path.windows(2).map(|pair| (pair[0], pair[1])));
        }
        Some(Self(edges))
    }

    fn cut_by(&self, wall: &Wall) -> bool {
        wall.severed_edges().iter().any(|edge| self.0.contains(edge))
    }
}
