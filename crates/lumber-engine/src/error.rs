//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of start-up so `main` can
//! propagate with `?`. Nothing that happens inside a cycle is an error at
//! this level; cycle faults travel in the reports.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lumber_core::ConfigError,
    },

    /// The sandbox world could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: lumber_world::WorldError,
    },
}
