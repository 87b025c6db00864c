//! Per-cycle fault taxonomy.
//!
//! Nothing in the decision core is fatal. Every failure either leaves the
//! mode unchanged so the next cycle retries, or triggers a defined fallback
//! transition. Faults are logged at a level reflecting how recoverable they
//! are and attached to the cycle report; they never escape `advance()` as
//! an `Err`.

use std::time::Duration;

use lumber_types::BlockReason;
use tracing::{debug, info, warn};

/// A recoverable failure observed during one cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleFault {
    /// No matching entity or item exists this cycle.
    #[error("not found: {what}")]
    NotFound {
        /// What was searched for.
        what: String,
    },

    /// The interaction request itself was rejected.
    #[error("interaction '{action}' on {target} was rejected")]
    InteractionRejected {
        /// Interaction label.
        action: String,
        /// Name of the target.
        target: String,
    },

    /// The interaction was accepted but its effect was not seen in time.
    #[error("interaction '{action}' on {target} not confirmed within {timeout:?}")]
    ConfirmationTimeout {
        /// Interaction label.
        action: String,
        /// Name of the target.
        target: String,
        /// Confirmation window that elapsed.
        timeout: Duration,
    },

    /// The destination could not be reached.
    #[error("navigation to {target} blocked: {reason}")]
    NavigationBlocked {
        /// Name of the destination entity.
        target: String,
        /// Why navigation gave up.
        reason: BlockReason,
    },

    /// Something the cycle depends on is absent.
    #[error("precondition missing: {what}")]
    PreconditionMissing {
        /// What is missing.
        what: String,
    },
}

impl CycleFault {
    /// Shorthand for [`CycleFault::NotFound`].
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Shorthand for [`CycleFault::PreconditionMissing`].
    pub fn missing(what: impl Into<String>) -> Self {
        Self::PreconditionMissing { what: what.into() }
    }

    /// Emit this fault on the structured log channel.
    ///
    /// Confirmation timeouts log at `info` and lost targets at `debug`;
    /// everything else is `warn`.
    pub fn log(&self, cycle: u64) {
        match self {
            Self::ConfirmationTimeout { .. } => info!(cycle, fault = %self, "Cycle inconclusive"),
            Self::NavigationBlocked {
                reason: BlockReason::TargetLost,
                ..
            } => debug!(cycle, fault = %self, "Target vanished mid-navigation"),
            Self::NotFound { .. }
            | Self::InteractionRejected { .. }
            | Self::NavigationBlocked { .. }
            | Self::PreconditionMissing { .. } => warn!(cycle, fault = %self, "Cycle fault"),
        }
    }
}
