//! Timed waits: poll a condition against the game clock until it holds or
//! a deadline passes.
//!
//! Every effect the core causes in the world is confirmed through one of
//! these waits. Suspension is cooperative: the wait calls
//! [`GameClock::sleep`] between polls and never spawns anything.
//!
//! A reset condition restarts the countdown while it holds, so that an
//! agent still walking towards its target is not declared to have failed.
//! Resets are capped at [`RESET_CEILING`] times the timeout so that no
//! wait is unbounded.

use std::time::Duration;

use rand::Rng;

use crate::world::GameClock;

/// Upper bound on a reset-extended wait, as a multiple of its timeout.
pub const RESET_CEILING: u32 = 8;

/// Poll-with-deadline helper shared by every component of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    poll_interval: Duration,
}

impl WaitPolicy {
    /// Create a policy that re-checks conditions every `poll_interval`.
    ///
    /// A zero interval is bumped to one millisecond so the clock always
    /// advances between polls.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    /// The interval between polls.
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Wait until `condition` holds or `timeout` elapses.
    ///
    /// Returns `true` iff the condition was observed before the timeout.
    pub fn wait_until<W>(
        &self,
        world: &mut W,
        timeout: Duration,
        condition: impl FnMut(&W) -> bool,
    ) -> bool
    where
        W: GameClock + ?Sized,
    {
        self.poll(world, timeout, condition, |_: &W| false)
    }

    /// Wait until `condition` holds, restarting the countdown from zero
    /// whenever `reset` holds.
    ///
    /// Returns `true` iff the condition was observed before the timeout.
    pub fn wait_until_or_reset<W>(
        &self,
        world: &mut W,
        timeout: Duration,
        condition: impl FnMut(&W) -> bool,
        reset: impl FnMut(&W) -> bool,
    ) -> bool
    where
        W: GameClock + ?Sized,
    {
        self.poll(world, timeout, condition, reset)
    }

    /// Wait while `condition` holds.
    ///
    /// Returns `true` iff the condition stopped holding before the timeout.
    pub fn wait_while<W>(
        &self,
        world: &mut W,
        timeout: Duration,
        mut condition: impl FnMut(&W) -> bool,
    ) -> bool
    where
        W: GameClock + ?Sized,
    {
        self.poll(world, timeout, |w: &W| !condition(w), |_: &W| false)
    }

    /// Shared poll loop behind every public wait.
    ///
    /// Returns `true` iff `condition` held before the (reset-extended)
    /// timeout.
    pub fn poll<W, C, R>(&self, world: &mut W, timeout: Duration, mut condition: C, mut reset: R) -> bool
    where
        W: GameClock + ?Sized,
        C: FnMut(&W) -> bool,
        R: FnMut(&W) -> bool,
    {
        let started = world.now();
        let ceiling = timeout.saturating_mul(RESET_CEILING);
        let mut window_start = started;

        loop {
            if condition(&*world) {
                return true;
            }

            let now = world.now();
            if now.saturating_sub(started) >= ceiling {
                return false;
            }
            if reset(&*world) {
                window_start = now;
            } else if now.saturating_sub(window_start) >= timeout {
                return false;
            }

            world.sleep(self.poll_interval);
        }
    }

    /// Sleep for a uniformly random duration in `[min_ms, max_ms]`.
    ///
    /// Used for deliberate pacing between UI actions. Returns the
    /// duration slept.
    pub fn pause<W, R>(&self, world: &mut W, rng: &mut R, min_ms: u64, max_ms: u64) -> Duration
    where
        W: GameClock + ?Sized,
        R: Rng,
    {
        let millis = if min_ms >= max_ms {
            min_ms
        } else {
            rng.random_range(min_ms..=max_ms)
        };
        let duration = Duration::from_millis(millis);
        world.sleep(duration);
        duration
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}
