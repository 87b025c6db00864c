//! The cycle scheduler: gates the state machine behind a one-time start
//! confirmation and runs it exactly once per host tick.
//!
//! The scheduler owns no loop. The host calls [`CycleScheduler::advance`]
//! on its own cadence and may simply stop calling it to halt the agent;
//! every cycle is bounded by its confirmation timeout, so there is nothing
//! to cancel mid-cycle.

use lumber_types::AgentMode;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, LumberConfig, TargetConfig};
use crate::machine::AgentStateMachine;
use crate::report::{CycleReport, SessionStats};
use crate::world::{GameWorld, Navigator};

/// A settings change reported by the host UI while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingChange {
    /// Setting key.
    pub key: String,
    /// New value, as displayed.
    pub value: String,
}

/// Levels missing to harvest the configured tree, if any.
pub fn level_shortfall(target: &TargetConfig) -> Option<u32> {
    target
        .tree
        .required_level()
        .checked_sub(target.woodcutting_level)
        .filter(|missing| *missing > 0)
}

/// Gated, one-cycle-per-tick driver for an [`AgentStateMachine`].
#[derive(Debug)]
pub struct CycleScheduler<P> {
    machine: AgentStateMachine<P>,
    confirmed: bool,
    cycle: u64,
    stats: SessionStats,
}

impl<P> CycleScheduler<P> {
    /// Build a scheduler from validated configuration.
    ///
    /// Warns, but does not fail, when the configured woodcutting level is
    /// below what the tree requires.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration fails
    /// validation.
    pub fn new(config: &LumberConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(missing) = level_shortfall(&config.target) {
            warn!(
                tree = %config.target.tree,
                level = config.target.woodcutting_level,
                required = config.target.tree.required_level(),
                missing,
                "Woodcutting level too low for the selected tree"
            );
        }
        Ok(Self {
            machine: AgentStateMachine::new(config),
            confirmed: false,
            cycle: 0,
            stats: SessionStats::default(),
        })
    }

    /// The start signal. Idempotent.
    pub fn confirm_settings(&mut self) {
        if self.confirmed {
            return;
        }
        self.confirmed = true;
        let target = self.machine.target();
        info!(
            resource = %target.resource_name,
            yield_item = %target.yield_name,
            disposal = %self.machine.disposal(),
            mode = %self.machine.mode(),
            "Settings confirmed, starting"
        );
    }

    /// Whether the start signal has been received.
    pub const fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Settings-change notification hook. Logged only.
    pub fn on_settings_changed(&self, change: &SettingChange) {
        debug!(key = %change.key, value = %change.value, "Setting changed");
    }

    /// Run one cycle, or nothing before start is confirmed.
    pub fn advance<W>(&mut self, world: &mut W) -> Option<CycleReport>
    where
        W: GameWorld + Navigator<Path = P>,
    {
        if !self.confirmed {
            return None;
        }
        self.cycle = self.cycle.saturating_add(1);
        let report = self.machine.run_cycle(world, self.cycle);
        self.stats.record(&report);
        Some(report)
    }

    /// The current mode.
    pub const fn mode(&self) -> AgentMode {
        self.machine.mode()
    }

    /// Totals since start.
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Number of cycles run.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The state machine, for inspection.
    pub const fn machine(&self) -> &AgentStateMachine<P> {
        &self.machine
    }
}
