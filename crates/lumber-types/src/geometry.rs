//! Tile geometry: positions, rectangular footprints, and destinations.
//!
//! The world is a flat grid of tiles. Distances are Chebyshev distances
//! (a diagonal step costs the same as a straight one), which matches how
//! the agent actually moves across the grid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tile on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Column, growing eastwards.
    pub x: i32,
    /// Row, growing northwards.
    pub y: i32,
}

impl Tile {
    /// Create a tile at the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to another tile.
    pub const fn distance_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// The adjacent tile one step closer to `goal` (diagonals allowed).
    ///
    /// Returns `self` when already on the goal.
    pub const fn step_toward(self, goal: Self) -> Self {
        Self {
            x: self.x.saturating_add((goal.x.saturating_sub(self.x)).signum()),
            y: self.y.saturating_add((goal.y.saturating_sub(self.y)).signum()),
        }
    }

    /// Offset this tile by `(dx, dy)`, saturating at the grid bounds of `i32`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle of tiles, inclusive on both corners.
///
/// Scene objects such as trees and bank booths occupy an area; the tiles
/// underneath are usually not walkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    /// South-west corner.
    pub min: Tile,
    /// North-east corner.
    pub max: Tile,
}

impl Area {
    /// Build an area spanning two corner tiles in any order.
    pub const fn new(a: Tile, b: Tile) -> Self {
        let (min_x, max_x) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
        let (min_y, max_y) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
        Self {
            min: Tile::new(min_x, min_y),
            max: Tile::new(max_x, max_y),
        }
    }

    /// An area covering exactly one tile.
    pub const fn single(tile: Tile) -> Self {
        Self {
            min: tile,
            max: tile,
        }
    }

    /// Whether the tile lies inside the area.
    pub const fn contains(&self, tile: Tile) -> bool {
        tile.x >= self.min.x && tile.x <= self.max.x && tile.y >= self.min.y && tile.y <= self.max.y
    }

    /// Chebyshev distance from `tile` to the closest tile of the area.
    ///
    /// Zero when the tile is inside the area.
    pub const fn distance_from(&self, tile: Tile) -> u32 {
        let dx = axis_gap(tile.x, self.min.x, self.max.x);
        let dy = axis_gap(tile.y, self.min.y, self.max.y);
        if dx > dy { dx } else { dy }
    }

    /// Every tile inside the area.
    pub fn tiles(&self) -> Vec<Tile> {
        (self.min.x..=self.max.x)
            .flat_map(|x| (self.min.y..=self.max.y).map(move |y| Tile::new(x, y)))
            .collect()
    }

    /// The ring of tiles immediately around the area, excluding the area itself.
    ///
    /// These are the tiles the agent can stand on to reach an object whose
    /// own footprint is not walkable.
    pub fn surrounding_tiles(&self) -> Vec<Tile> {
        let outer = Self::new(self.min.offset(-1, -1), self.max.offset(1, 1));
        outer
            .tiles()
            .into_iter()
            .filter(|tile| !self.contains(*tile))
            .collect()
    }
}

/// Gap between `value` and the inclusive range `[lo, hi]` on one axis.
const fn axis_gap(value: i32, lo: i32, hi: i32) -> u32 {
    if value < lo {
        lo.abs_diff(value)
    } else if value > hi {
        value.abs_diff(hi)
    } else {
        0
    }
}

/// Where a navigation episode is trying to get the agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    /// A single tile.
    Tile(Tile),
    /// Any tile of an object's footprint.
    Area(Area),
    /// Any one of an explicit set of acceptable tiles.
    AnyOf(Vec<Tile>),
}

impl Destination {
    /// Chebyshev distance from `from` to the nearest acceptable tile.
    ///
    /// Returns `None` for an empty [`Destination::AnyOf`] set.
    pub fn distance_from(&self, from: Tile) -> Option<u32> {
        match self {
            Self::Tile(tile) => Some(from.distance_to(*tile)),
            Self::Area(area) => Some(area.distance_from(from)),
            Self::AnyOf(tiles) => tiles.iter().map(|tile| from.distance_to(*tile)).min(),
        }
    }

    /// The acceptable goal tiles for path building.
    pub fn goal_tiles(&self) -> Vec<Tile> {
        match self {
            Self::Tile(tile) => vec![*tile],
            Self::Area(area) => area.tiles(),
            Self::AnyOf(tiles) => tiles.clone(),
        }
    }

    /// The tiles surrounding this destination, used when the destination
    /// itself cannot be stood on.
    pub fn surrounding_tiles(&self) -> Vec<Tile> {
        match self {
            Self::Tile(tile) => Area::single(*tile).surrounding_tiles(),
            Self::Area(area) => area.surrounding_tiles(),
            Self::AnyOf(tiles) => tiles.clone(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile(tile) => write!(f, "{tile}"),
            Self::Area(area) => write!(f, "{}..{}", area.min, area.max),
            Self::AnyOf(tiles) => write!(f, "any of {} tiles", tiles.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_counts_diagonals_once() {
        assert_eq!(Tile::new(0, 0).distance_to(Tile::new(3, 7)), 7);
        assert_eq!(Tile::new(-2, 4).distance_to(Tile::new(2, 4)), 4);
    }

    #[test]
    fn step_toward_moves_diagonally() {
        let next = Tile::new(0, 0).step_toward(Tile::new(5, -3));
        assert_eq!(next, Tile::new(1, -1));
        assert_eq!(Tile::new(2, 2).step_toward(Tile::new(2, 2)), Tile::new(2, 2));
    }

    #[test]
    fn area_distance_is_zero_inside() {
        let area = Area::new(Tile::new(4, 4), Tile::new(5, 5));
        assert_eq!(area.distance_from(Tile::new(5, 4)), 0);
        assert_eq!(area.distance_from(Tile::new(8, 5)), 3);
        assert_eq!(area.distance_from(Tile::new(0, 0)), 4);
    }

    #[test]
    fn surrounding_ring_excludes_footprint() {
        let area = Area::single(Tile::new(10, 10));
        let ring = area.surrounding_tiles();
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&Tile::new(10, 10)));
        assert!(ring.contains(&Tile::new(9, 11)));

        let wide = Area::new(Tile::new(0, 0), Tile::new(1, 1));
        assert_eq!(wide.surrounding_tiles().len(), 12);
    }

    #[test]
    fn empty_any_of_has_no_distance() {
        assert_eq!(Destination::AnyOf(Vec::new()).distance_from(Tile::new(0, 0)), None);
    }
}
