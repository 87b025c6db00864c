//! Deterministic sandbox world for the Lumber harvesting agent.
//!
//! The sandbox implements every collaborator trait of `lumber-core` on a
//! small tile grid with a virtual clock, so the decision core can be run
//! end to end without a game client: by the engine binary for a demo
//! session, and by the scenario tests.
//!
//! # Modules
//!
//! - [`sandbox`] -- The world itself and its trait implementations
//! - [`builder`] -- Fluent, validated layout construction
//! - [`forest`] -- The default layout used by the engine
//! - [`grid`] -- Bounds, obstacles, and greedy straight-line paths
//! - [`trees`] -- Trees that fall after a few logs and regrow
//! - [`inventory`] -- A fixed-size slot inventory
//! - [`error`] -- Layout errors

pub mod builder;
pub mod error;
pub mod forest;
pub mod grid;
pub mod inventory;
pub mod sandbox;
pub mod trees;

pub use builder::SandboxBuilder;
pub use error::WorldError;
pub use forest::default_forest;
pub use sandbox::{Sandbox, SandboxPath, SandboxSettings, SandboxStats};
