//! The set of placed walls and the indices derived from it.

use crate::position::Position;
use crate::wall::{Edge, Wall, WallSlot};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Placed walls in placement order, plus O(1) lookup indices.
///
/// `severed_edges` and `occupied_slots` are always the union of the
/// contributions of the walls currently held. Because no two held walls
/// share a slot, removing a wall can subtract its own contribution
/// without touching anyone else's.
///
/// Cloning produces an independent manager, which is how speculative
/// "what if this wall were placed" checks are done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallManager {
    walls: Vec<Wall>,
    severed_edges: HashSet<Edge>,
    occupied_slots: HashSet<WallSlot>,
}

impl WallManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a manager by placing `walls` in order.
    ///
    /// Returns the first wall that conflicts with an earlier one.
    #[instrument(skip(walls))]
    pub fn from_walls(walls: impl IntoIterator<Item = Wall>) -> Result<Self, Wall> {
        let mut manager = Self::new();
        for wall in walls {
            if !manager.add_wall(wall) {
                return Err(wall);
            }
        }
        Ok(manager)
    }

    /// Placed walls, oldest first.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Number of walls placed.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// True if no wall has been placed.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Every blocked ordered cell pair.
    pub fn severed_edges(&self) -> &HashSet<Edge> {
        &self.severed_edges
    }

    /// Every occupied wall-grid slot.
    pub fn occupied_slots(&self) -> &HashSet<WallSlot> {
        &self.occupied_slots
    }

    /// True if `wall` shares no slot with a placed wall.
    pub fn can_place_wall(&self, wall: &Wall) -> bool {
        wall.occupied_slots()
            .iter()
            .all(|slot| !self.occupied_slots.contains(slot))
    }

    /// Places `wall` unless it overlaps or crosses a placed wall.
    #[instrument(level = "trace", skip(self), fields(placed = self.walls.len()))]
    pub fn add_wall(&mut self, wall: Wall) -> bool {
        if !self.can_place_wall(&wall) {
            debug!(%wall, "Wall conflicts with a placed wall");
            return false;
        }
        self.walls.push(wall);
        self.severed_edges.extend(wall.severed_edges());
        self.occupied_slots.extend(wall.occupied_slots());
        true
    }

    /// True if a wall blocks the step from `from` to `to`.
    pub fn is_move_blocked(&self, from: Position, to: Position) -> bool {
        self.severed_edges.contains(&(from, to))
    }

    /// Removes the most recently placed wall.
    #[instrument(level = "trace", skip(self), fields(placed = self.walls.len()))]
    pub fn remove_last_wall(&mut self) -> Option<Wall> {
        let wall = self.walls.pop()?;
        for edge in wall.severed_edges() {
            self.severed_edges.remove(&edge);
        }
        for slot in wall.occupied_slots() {
            self.occupied_slots.remove(&slot);
        }
        Some(wall)
    }

    /// A copy of this manager with `wall` added, or `None` on a slot conflict.
    ///
    /// `self` is never touched.
    pub fn with_wall(&self, wall: Wall) -> Option<Self> {
        let mut speculative = self.clone();
        speculative.add_wall(wall).then_some(speculative)
    }
}
