//! Shared type definitions for the Lumber harvesting agent.
//!
//! This crate is the vocabulary shared by the decision core, the sandbox
//! world, and the host binary. It holds no behaviour beyond small
//! geometric helpers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for world entities and items
//! - [`geometry`] -- Tiles, rectangular areas, and navigation destinations
//! - [`enums`] -- Agent modes, disposal modes, outcomes, and the tree catalogue
//! - [`structs`] -- Entities, items, agent status, targets, and snapshots

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ActionOutcome, AgentMode, BlockReason, DisposalMode, EntityKind, NavResult, TreeType,
};
pub use geometry::{Area, Destination, Tile};
pub use ids::{EntityId, ItemId};
pub use structs::{
    AgentStatus, DEFAULT_HARVEST_ACTION, Entity, Item, PathCapabilities, Sighting, TargetSpec,
    WorldSnapshot,
};
