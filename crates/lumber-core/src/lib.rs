//! Decision core for the Lumber harvesting agent.
//!
//! This crate decides, once per host tick, the single action the agent
//! takes in a game world it can only observe and poke through collaborator
//! traits. It tolerates targets that vanish between perception and action,
//! interactions that are accepted but have no effect, and paths that stall.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`world`] -- Collaborator traits the game client (or sandbox) implements
//! - [`wait`] -- Poll-with-deadline timed waits on the game clock
//! - [`perception`] -- Fresh per-cycle world snapshots
//! - [`navigation`] -- One-step-per-cycle navigation with bounded retries
//! - [`interaction`] -- Request-then-confirm interaction units
//! - [`storage`] -- The "can be opened for storage" capability
//! - [`machine`] -- Harvesting / Discarding / Storing state machine
//! - [`scheduler`] -- Start gating and the per-tick `advance()` entry point
//! - [`report`] -- Cycle reports and session totals
//! - [`error`] -- Recoverable per-cycle faults
//!
//! # Cycle
//!
//! ```text
//! advance() -> perceive -> (navigate one step | one verified interaction | transition) -> report
//! ```

pub mod config;
pub mod error;
pub mod interaction;
pub mod machine;
pub mod navigation;
pub mod perception;
pub mod report;
pub mod scheduler;
pub mod storage;
pub mod wait;
pub mod world;

#[cfg(test)]
mod testkit;

pub use config::{ConfigError, LumberConfig};
pub use error::CycleFault;
pub use machine::AgentStateMachine;
pub use report::{CycleAction, CycleReport, SessionStats};
pub use scheduler::{CycleScheduler, SettingChange};
pub use world::GameWorld;
