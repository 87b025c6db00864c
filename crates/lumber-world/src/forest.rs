//! The default forest used by the engine binary.
//!
//! A 48x48 clearing with every catalogue tree, a bank booth near the
//! spawn, a banker in the far corner, and a river that cuts the willows
//! off from the spawn except by a ford at the south end.

use lumber_types::{Tile, TreeType};

use crate::builder::SandboxBuilder;
use crate::error::WorldError;
use crate::sandbox::Sandbox;

/// Where the agent spawns.
pub const SPAWN: Tile = Tile::new(10, 10);

/// Build the default forest.
///
/// # Errors
///
/// Only fails if the built-in layout is inconsistent.
pub fn default_forest(seed: u64) -> Result<Sandbox, WorldError> {
    forest_builder(seed).build()
}

/// The default forest as a builder, for callers that want to tweak it.
pub fn forest_builder(seed: u64) -> SandboxBuilder {
    SandboxBuilder::new(48, 48)
        .seed(seed)
        .agent_at(SPAWN)
        .booth(Tile::new(4, 4))
        .booth(Tile::new(5, 4))
        .banker(Tile::new(44, 44))
        // River with a ford at y = 0..=2.
        .wall(Tile::new(28, 3), Tile::new(28, 30))
        .tree(TreeType::Normal, Tile::new(14, 10))
        .tree(TreeType::Normal, Tile::new(15, 14))
        .tree(TreeType::Normal, Tile::new(12, 16))
        .tree(TreeType::Oak, Tile::new(20, 12))
        .tree(TreeType::Oak, Tile::new(22, 15))
        .tree(TreeType::Oak, Tile::new(19, 18))
        .tree(TreeType::Willow, Tile::new(31, 12))
        .tree(TreeType::Willow, Tile::new(32, 16))
        .tree(TreeType::Maple, Tile::new(36, 30))
        .tree(TreeType::Maple, Tile::new(38, 33))
        .tree(TreeType::Yew, Tile::new(10, 36))
        .tree(TreeType::Magic, Tile::new(42, 40))
}
