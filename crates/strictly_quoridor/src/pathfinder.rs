//! Breadth-first reachability over the wall-cut board graph.

use crate::board::{Board, Direction};
use crate::position::Position;
use crate::wall_manager::WallManager;
use std::collections::VecDeque;
use tracing::{debug, instrument};

const CELLS: usize = (Board::SIZE * Board::SIZE) as usize;

/// Stateless shortest-path queries.
///
/// Every edge has unit weight and the graph has 81 nodes, so plain BFS
/// returns shortest paths. Pawns are ignored: only walls cut edges.
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder;

impl Pathfinder {
    /// Shortest path from `start` to any cell on `goal_row`, both ends included.
    ///
    /// Returns `[start]` when already on the goal row and `None` when the
    /// row cannot be reached.
    #[instrument(level = "trace", skip(wall_manager))]
    pub fn find_shortest_path(
        start: Position,
        goal_row: i32,
        wall_manager: &WallManager,
    ) -> Option<Vec<Position>> {
        if start.row() == goal_row {
            return Some(vec![start]);
        }

        let mut visited = [false; CELLS];
        let mut parent: [Option<Position>; CELLS] = [None; CELLS];
        let mut queue = VecDeque::with_capacity(CELLS);
        visited[start.index()] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for direction in Direction::ALL {
                let Some(next) = current.step(direction) else {
                    continue;
                };
                if visited[next.index()] || wall_manager.is_move_blocked(current, next) {
                    continue;
                }
                visited[next.index()] = true;
                parent[next.index()] = Some(current);

                if next.row() == goal_row {
                    return Some(Self::trace_back(next, &parent));
                }
                queue.push_back(next);
            }
        }

        debug!(%start, goal_row, "Goal row unreachable");
        None
    }

    fn trace_back(end: Position, parent: &[Option<Position>; CELLS]) -> Vec<Position> {
        let mut path = vec![end];
        let mut cursor = end;
        while let Some(prev) = parent[cursor.index()] {
            path.push(prev);
            cursor = prev;
        }
        path.reverse();
        path
    }

    /// True if `goal_row` can be reached from `start`.
    pub fn has_path_to_goal(start: Position, goal_row: i32, wall_manager: &WallManager) -> bool {
        Self::find_shortest_path(start, goal_row, wall_manager).is_some()
    }

    /// Number of steps on the shortest path, `Some(0)` when already there.
    pub fn shortest_distance(
        start: Position,
        goal_row: i32,
        wall_manager: &WallManager,
    ) -> Option<usize> {
        Self::find_shortest_path(start, goal_row, wall_manager).map(|path| path.len() - 1)
    }

    /// Shortest distance with `-1` for "unreachable", for callers that
    /// store distances as plain integers.
    pub fn get_shortest_distance(start: Position, goal_row: i32, wall_manager: &WallManager) -> i32 {
        Self::shortest_distance(start, goal_row, wall_manager)
            .map_or(-1, |steps| steps as i32)
    }

    /// True if both players can still reach their goal rows.
    ///
    /// `wall_manager` must already contain the candidate wall.
    #[instrument(level = "trace", skip(wall_manager))]
    pub fn can_place_wall_safely(
        wall_manager: &WallManager,
        player1_pos: Position,
        player1_goal: i32,
        player2_pos: Position,
        player2_goal: i32,
    ) -> bool {
        Self::has_path_to_goal(player1_pos, player1_goal, wall_manager)
            && Self::has_path_to_goal(player2_pos, player2_goal, wall_manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall::{Orientation, Wall};

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    fn wall(row: i32, col: i32, orientation: Orientation) -> Wall {
        Wall::new(row, col, orientation).unwrap()
    }

    #[test]
    fn test_open_board_straight_line() {
        let walls = WallManager::new();
        let path = Pathfinder::find_shortest_path(pos(8, 4), 0, &walls).unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&pos(8, 4)));
        assert_eq!(path.last().map(|p| p.row()), Some(0));
        assert_eq!(Pathfinder::shortest_distance(pos(8, 4), 0, &walls), Some(8));
    }

    #[test]
    fn test_already_on_goal_row() {
        let walls = WallManager::new();
        assert_eq!(
            Pathfinder::find_shortest_path(pos(0, 3), 0, &walls),
            Some(vec![pos(0, 3)])
        );
        assert_eq!(Pathfinder::get_shortest_distance(pos(0, 3), 0, &walls), 0);
    }

    #[test]
    fn test_path_steps_are_adjacent_and_unblocked() {
        let walls = WallManager::from_walls([
            wall(3, 3, Orientation::Horizontal),
            wall(3, 5, Orientation::Horizontal),
            wall(2, 2, Orientation::Vertical),
        ])
        .unwrap();
        let path = Pathfinder::find_shortest_path(pos(8, 4), 0, &walls).unwrap();
        for pair in path.windows(2) {
            assert!(Board::direction_between(pair[0], pair[1]).is_some());
            assert!(!walls.is_move_blocked(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_detour_around_wall() {
        let walls = WallManager::from_walls([wall(7, 4, Orientation::Horizontal)]).unwrap();
        // (8,4) must step sideways to (8,3) before heading up.
        assert_eq!(Pathfinder::shortest_distance(pos(8, 4), 0, &walls), Some(9));
        assert_eq!(Pathfinder::shortest_distance(pos(8, 5), 0, &walls), Some(9));
    }

    #[test]
    fn test_enclosed_cell_is_unreachable() {
        // (0,0) and (0,1) sealed: wall below both, wall right of (0,1).
        let walls = WallManager::from_walls([
            wall(0, 0, Orientation::Horizontal),
            wall(0, 1, Orientation::Vertical),
        ])
        .unwrap();
        assert_eq!(Pathfinder::find_shortest_path(pos(0, 0), 8, &walls), None);
        assert_eq!(Pathfinder::get_shortest_distance(pos(0, 1), 8, &walls), -1);
        assert!(Pathfinder::has_path_to_goal(pos(0, 2), 8, &walls));
    }

    #[test]
    fn test_can_place_wall_safely_requires_both() {
        let sealed = WallManager::from_walls([
            wall(0, 0, Orientation::Horizontal),
            wall(0, 1, Orientation::Vertical),
        ])
        .unwrap();
        assert!(!Pathfinder::can_place_wall_safely(&sealed, pos(8, 4), 0, pos(0, 0), 8));
        assert!(Pathfinder::can_place_wall_safely(&sealed, pos(8, 4), 0, pos(0, 4), 8));
    }

    #[test]
    fn test_distance_unchanged_by_clone() {
        let walls = WallManager::from_walls([
            wall(4, 0, Orientation::Horizontal),
            wall(4, 2, Orientation::Horizontal),
            wall(4, 4, Orientation::Horizontal),
            wall(4, 6, Orientation::Horizontal),
        ])
        .unwrap();
        let copy = walls.clone();
        for col in 0..9 {
            let start = pos(8, col);
            assert_eq!(
                Pathfinder::shortest_distance(start, 0, &walls),
                Pathfinder::shortest_distance(start, 0, &copy)
            );
        }
    }
}
