//! The tile grid: bounds, static obstacles, and greedy straight-line paths.
//!
//! Path building here is deliberately naive. It walks the straight line
//! towards the goal and sidesteps along one axis when the diagonal is
//! blocked. When every candidate is blocked it keeps the straight-line tile,
//! so the path is still produced but stepping onto that tile fails. That is
//! what lets a closed gate stall the agent the way a real client does.

use std::collections::BTreeSet;

use lumber_types::Tile;

use crate::error::WorldError;

/// Grid bounds plus static obstacles.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    obstacles: BTreeSet<Tile>,
}

impl Grid {
    /// An empty `width` x `height` grid with its origin at `(0, 0)`.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            obstacles: BTreeSet::new(),
        }
    }

    /// Grid width.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `tile` lies on the grid.
    pub fn in_bounds(&self, tile: Tile) -> bool {
        let fits = |value: i32, limit: u32| u32::try_from(value).is_ok_and(|v| v < limit);
        fits(tile.x, self.width) && fits(tile.y, self.height)
    }

    /// Fail with [`WorldError::OutOfBounds`] unless `tile` is on the grid.
    pub fn check(&self, tile: Tile) -> Result<(), WorldError> {
        if self.in_bounds(tile) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds {
                tile,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Mark `tile` as impassable.
    pub fn add_obstacle(&mut self, tile: Tile) {
        self.obstacles.insert(tile);
    }

    /// Whether `tile` is a static obstacle.
    pub fn is_obstacle(&self, tile: Tile) -> bool {
        self.obstacles.contains(&tile)
    }

    /// Number of obstacle tiles.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }
}

/// Greedy straight-line path from `from` to `goal`, excluding `from`.
///
/// `passable` decides which tiles the sidestep may use. The path length is
/// capped at twice the distance plus a small margin.
pub fn greedy_path(from: Tile, goal: Tile, passable: impl Fn(Tile) -> bool) -> Vec<Tile> {
    let limit = from.distance_to(goal).saturating_mul(2).saturating_add(4);
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut path = Vec::new();
    let mut at = from;

    while at != goal && path.len() < limit {
        let direct = at.step_toward(goal);
        let next = [direct, Tile::new(direct.x, at.y), Tile::new(at.x, direct.y)]
            .into_iter()
            .filter(|tile| *tile != at)
            .find(|tile| *tile == goal || passable(*tile))
            .unwrap_or(direct);
        path.push(next);
        at = next;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(10, 5);
        assert!(grid.in_bounds(Tile::new(0, 0)));
        assert!(grid.in_bounds(Tile::new(9, 4)));
        assert!(!grid.in_bounds(Tile::new(10, 4)));
        assert!(!grid.in_bounds(Tile::new(-1, 0)));
        assert!(grid.check(Tile::new(3, 7)).is_err());
    }

    #[test]
    fn open_ground_is_a_straight_line() {
        let path = greedy_path(Tile::new(0, 0), Tile::new(4, 2), |_| true);
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&Tile::new(4, 2)));
    }

    #[test]
    fn sidesteps_a_single_obstacle() {
        let blocked = Tile::new(1, 1);
        let path = greedy_path(Tile::new(0, 0), Tile::new(3, 3), |t| t != blocked);
        assert!(!path.contains(&blocked));
        assert_eq!(path.last(), Some(&Tile::new(3, 3)));
    }

    #[test]
    fn walls_stay_on_the_path() {
        let path = greedy_path(Tile::new(0, 0), Tile::new(5, 0), |t| t.x != 2);
        assert!(path.contains(&Tile::new(2, 0)));
    }
}
