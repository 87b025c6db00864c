//! The host loop: drives the cycle scheduler once per tick against the
//! sandbox, with run bounds and a clean stop.
//!
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Clean stop**: a stop request (Ctrl-C) is honoured between ticks
//!
//! Each tick runs at most one cycle, then moves the sandbox clock forward
//! by the simulated tick length. The real-time sleep between ticks is
//! separate so tests and batch runs can go as fast as possible.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use lumber_core::config::HostConfig;
use lumber_core::{CycleReport, CycleScheduler, SessionStats};
use lumber_types::AgentMode;
use lumber_world::{Sandbox, SandboxPath};
use tracing::{debug, info};

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// Reached the configured `max_ticks`.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds`.
    MaxRealTimeReached,
    /// A stop was requested.
    Stopped,
}

/// Shared run control, read by the loop and written by signal handlers.
#[derive(Debug)]
pub struct HostControl {
    stop_requested: AtomicBool,
    started_at: Instant,
    tick_interval: Duration,
    max_ticks: u64,
    max_real_time_seconds: u64,
}

impl HostControl {
    /// Control with the bounds from `host`, sleeping `tick_interval`
    /// of real time between ticks.
    pub fn new(tick_interval: Duration, host: &HostConfig) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            started_at: Instant::now(),
            tick_interval,
            max_ticks: host.max_ticks,
            max_real_time_seconds: host.max_real_time_seconds,
        }
    }

    /// Ask the loop to stop before its next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Real time slept between ticks.
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Configured tick bound (0 = unbounded).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Configured wall-clock bound in seconds (0 = unbounded).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }

    /// Whether `ticks` completed ticks hit the tick bound.
    pub const fn tick_limit_reached(&self, ticks: u64) -> bool {
        self.max_ticks > 0 && ticks >= self.max_ticks
    }

    /// Whether the wall-clock bound has passed.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Whole seconds since the control was created.
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Called after every cycle the loop runs.
pub trait CycleCallback: Send {
    /// Inspect a finished cycle and the world it ran against.
    fn on_cycle(&mut self, report: &CycleReport, world: &Sandbox);
}

/// Logs session totals every `every` cycles.
#[derive(Debug)]
pub struct ProgressLog {
    every: u64,
    stats: SessionStats,
}

impl ProgressLog {
    /// Log every `every` cycles (0 disables the periodic line).
    pub fn new(every: u64) -> Self {
        Self {
            every,
            stats: SessionStats::default(),
        }
    }
}

impl CycleCallback for ProgressLog {
    fn on_cycle(&mut self, report: &CycleReport, world: &Sandbox) {
        self.stats.record(report);
        if self.every == 0 || report.cycle.checked_rem(self.every) != Some(0) {
            return;
        }
        info!(
            cycle = report.cycle,
            mode = %report.mode_after,
            harvest_attempts = self.stats.harvest_attempts,
            items_discarded = self.stats.items_discarded,
            items_deposited = self.stats.items_deposited,
            faults = self.stats.faults,
            sim_seconds = world.now().as_secs(),
            "Progress"
        );
    }
}

/// Outcome of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Why the loop stopped.
    pub end_reason: RunEndReason,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Scheduler totals at the end.
    pub stats: SessionStats,
    /// Mode the agent was left in.
    pub final_mode: AgentMode,
    /// Simulated time elapsed in the sandbox.
    pub sim_time: Duration,
}

/// Run ticks until a bound is hit or a stop is requested.
///
/// `sim_tick` is how far the sandbox clock moves after each cycle.
pub async fn run_host(
    scheduler: &mut CycleScheduler<SandboxPath>,
    world: &mut Sandbox,
    control: &HostControl,
    sim_tick: Duration,
    callback: &mut dyn CycleCallback,
) -> RunResult {
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = control.max_ticks(),
        max_real_time_seconds = control.max_real_time_seconds(),
        tick_interval_ms = control.tick_interval().as_millis(),
        sim_tick_ms = sim_tick.as_millis(),
        "Host loop starting"
    );

    let end_reason = loop {
        if control.is_stop_requested() {
            info!("Stop requested");
            break RunEndReason::Stopped;
        }

        if control.time_limit_reached() {
            info!(
                max_seconds = control.max_real_time_seconds(),
                elapsed = control.elapsed_seconds(),
                "Real-time limit reached"
            );
            break RunEndReason::MaxRealTimeReached;
        }

        match scheduler.advance(world) {
            Some(report) => callback.on_cycle(&report, world),
            None => debug!("Waiting for start confirmation"),
        }
        world.advance(sim_tick);
        total_ticks = total_ticks.saturating_add(1);

        if control.tick_limit_reached(total_ticks) {
            info!(ticks = total_ticks, max_ticks = control.max_ticks(), "Tick limit reached");
            break RunEndReason::MaxTicksReached;
        }

        if !control.tick_interval().is_zero() {
            tokio::time::sleep(control.tick_interval()).await;
        }
    };

    RunResult {
        end_reason,
        total_ticks,
        stats: scheduler.stats(),
        final_mode: scheduler.mode(),
        sim_time: world.now(),
    }
}

/// Log the end-of-run line.
pub fn log_run_end(result: &RunResult, world: &Sandbox) {
    let sandbox = world.stats();
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        mode = %result.final_mode,
        sim_seconds = result.sim_time.as_secs(),
        cycles = result.stats.cycles,
        harvest_attempts = result.stats.harvest_attempts,
        items_discarded = result.stats.items_discarded,
        items_deposited = result.stats.items_deposited,
        blocked_navigations = result.stats.blocked_navigations,
        faults = result.stats.faults,
        logs_chopped = sandbox.logs_chopped,
        path_builds = sandbox.path_builds,
        "Run ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumber_core::LumberConfig;
    use lumber_types::{DisposalMode, TreeType};
    use lumber_world::default_forest;

    use super::*;

    fn config(tree: TreeType, disposal: DisposalMode) -> LumberConfig {
        let mut config = LumberConfig::default();
        config.target.tree = tree;
        config.target.woodcutting_level = 99;
        config.disposal.mode = disposal;
        config
    }

    fn bounded(max_ticks: u64) -> HostControl {
        let host = HostConfig {
            max_ticks,
            ..HostConfig::default()
        };
        HostControl::new(Duration::ZERO, &host)
    }

    struct Counter {
        cycles: u64,
        max_interactions: u8,
    }

    impl CycleCallback for Counter {
        fn on_cycle(&mut self, report: &CycleReport, _world: &Sandbox) {
            self.cycles = self.cycles.saturating_add(1);
            self.max_interactions = self.max_interactions.max(report.interactions);
        }
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let config = config(TreeType::Normal, DisposalMode::Drop);
        let mut scheduler = CycleScheduler::new(&config).unwrap();
        scheduler.confirm_settings();
        let mut world = default_forest(7).unwrap();
        let mut callback = ProgressLog::new(0);

        let result = run_host(
            &mut scheduler,
            &mut world,
            &bounded(5),
            Duration::from_millis(600),
            &mut callback,
        )
        .await;

        assert_eq!(result.end_reason, RunEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.stats.cycles, 5);
        assert_eq!(callback.stats, result.stats);
        assert!(result.sim_time >= Duration::from_millis(3000));
    }

    #[tokio::test]
    async fn stop_request_ends_before_the_first_tick() {
        let config = config(TreeType::Normal, DisposalMode::Drop);
        let mut scheduler = CycleScheduler::new(&config).unwrap();
        scheduler.confirm_settings();
        let mut world = default_forest(7).unwrap();
        let control = bounded(0);
        control.request_stop();

        let result = run_host(
            &mut scheduler,
            &mut world,
            &control,
            Duration::from_millis(600),
            &mut ProgressLog::new(0),
        )
        .await;

        assert_eq!(result.end_reason, RunEndReason::Stopped);
        assert_eq!(result.total_ticks, 0);
        assert_eq!(world.stats().interactions, 0);
    }

    #[tokio::test]
    async fn unconfirmed_scheduler_runs_no_cycles() {
        let config = config(TreeType::Normal, DisposalMode::Drop);
        let mut scheduler = CycleScheduler::new(&config).unwrap();
        let mut world = default_forest(7).unwrap();
        let mut counter = Counter {
            cycles: 0,
            max_interactions: 0,
        };

        let result = run_host(
            &mut scheduler,
            &mut world,
            &bounded(10),
            Duration::from_millis(600),
            &mut counter,
        )
        .await;

        assert_eq!(result.total_ticks, 10);
        assert_eq!(counter.cycles, 0);
        assert_eq!(world.stats().interactions, 0);
        assert_eq!(world.now(), Duration::from_millis(6000));
    }

    #[tokio::test]
    async fn long_run_keeps_one_interaction_per_cycle() {
        let config = config(TreeType::Oak, DisposalMode::Bank);
        let mut scheduler = CycleScheduler::new(&config).unwrap();
        scheduler.confirm_settings();
        let mut world = default_forest(3).unwrap();
        let mut counter = Counter {
            cycles: 0,
            max_interactions: 0,
        };

        let result = run_host(
            &mut scheduler,
            &mut world,
            &bounded(2_000),
            Duration::from_millis(600),
            &mut counter,
        )
        .await;

        assert_eq!(counter.cycles, 2_000);
        assert_eq!(counter.max_interactions, 1);
        assert!(result.stats.harvest_attempts > 0);
        assert!(world.stats().interactions <= 2_000);
    }

    #[test]
    fn limits_of_zero_are_unbounded() {
        let control = bounded(0);
        assert!(!control.tick_limit_reached(u64::MAX));
        assert!(!control.time_limit_reached());
        assert!(bounded(3).tick_limit_reached(3));
    }
}
