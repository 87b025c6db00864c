//! The interaction verifier: the single place where the core asks the
//! world to do something.
//!
//! An interaction is "request, then confirm by observation". The request's
//! boolean return only says whether it was accepted; success is declared
//! only after the expected effect is seen within the confirmation window.
//!
//! Each cycle mints one [`InteractionToken`] and the verifier consumes it
//! by value, so issuing two interactions in a cycle does not type-check.

use std::time::Duration;

use lumber_types::ActionOutcome;
use tracing::debug;

use crate::wait::WaitPolicy;
use crate::world::{GameClock, Interact};

/// Permission to issue exactly one interaction.
///
/// Not `Clone` or `Copy`. Minted once per cycle by the state machine.
#[derive(Debug)]
pub struct InteractionToken {
    cycle: u64,
}

impl InteractionToken {
    pub(crate) const fn mint(cycle: u64) -> Self {
        Self { cycle }
    }

    /// The cycle this token was minted for.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }
}

type Probe<'a, W> = Box<dyn FnMut(&W) -> bool + 'a>;

/// What an accepted interaction is expected to cause, and how long to
/// wait for it.
pub struct Expectation<'a, W: ?Sized> {
    timeout: Duration,
    started: Probe<'a, W>,
    reset: Option<Probe<'a, W>>,
}

impl<'a, W: ?Sized> Expectation<'a, W> {
    /// Expect `started` to hold within `timeout`.
    pub fn new(timeout: Duration, started: impl FnMut(&W) -> bool + 'a) -> Self {
        Self {
            timeout,
            started: Box::new(started),
            reset: None,
        }
    }

    /// Restart the countdown while `reset` holds (e.g. the agent is still
    /// walking to the target).
    #[must_use]
    pub fn reset_while(mut self, reset: impl FnMut(&W) -> bool + 'a) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// The confirmation window.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<W: ?Sized> std::fmt::Debug for Expectation<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("timeout", &self.timeout)
            .field("resets", &self.reset.is_some())
            .finish_non_exhaustive()
    }
}

/// Runs one interaction-then-confirm unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionVerifier {
    wait: WaitPolicy,
}

impl InteractionVerifier {
    /// Create a verifier that confirms effects with `wait`.
    pub const fn new(wait: WaitPolicy) -> Self {
        Self { wait }
    }

    /// Issue `action` on `target` and confirm it had its expected effect.
    ///
    /// A rejected request returns [`ActionOutcome::Failed`] immediately
    /// without waiting. An accepted one returns
    /// [`ActionOutcome::Success`] if the expectation held within its
    /// window, otherwise [`ActionOutcome::TimedOut`].
    pub fn perform_and_verify<W, T>(
        &self,
        world: &mut W,
        token: InteractionToken,
        target: &T,
        action: &str,
        expectation: Expectation<'_, W>,
    ) -> ActionOutcome
    where
        W: GameClock + Interact<T> + ?Sized,
        T: ?Sized,
    {
        let InteractionToken { cycle } = token;

        if !world.interact(target, action) {
            debug!(cycle, action, "Interaction rejected");
            return ActionOutcome::Failed;
        }

        let Expectation {
            timeout,
            started,
            reset,
        } = expectation;
        let confirmed = match reset {
            Some(reset) => self.wait.poll(world, timeout, started, reset),
            None => self.wait.poll(world, timeout, started, |_: &W| false),
        };

        let outcome = if confirmed {
            ActionOutcome::Success
        } else {
            ActionOutcome::TimedOut
        };
        debug!(cycle, action, ?outcome, ?timeout, "Interaction verified");
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumber_types::{EntityKind, Tile};

    use super::*;
    use crate::testkit::ScriptedWorld;
    use crate::storage::OpensStorage;
    use crate::world::{Inventory, Scene, StorageAccess};

    fn verifier() -> InteractionVerifier {
        InteractionVerifier::new(WaitPolicy::default())
    }

    fn busy(world: &ScriptedWorld) -> bool {
        world.local_agent().is_some_and(|agent| agent.is_busy())
    }

    #[test]
    fn accepted_and_observed_is_success() {
        let mut world = ScriptedWorld::new();
        let tree = world.add_object("Oak tree", Tile::new(1, 0));

        let outcome = verifier().perform_and_verify(
            &mut world,
            InteractionToken::mint(1),
            &tree,
            "Chop down",
            Expectation::new(Duration::from_millis(1200), busy),
        );

        assert_eq!(outcome, ActionOutcome::Success);
        assert_eq!(world.requests.len(), 1);
        assert_eq!(world.now, Duration::ZERO);
    }

    #[test]
    fn rejected_request_fails_without_waiting() {
        let mut world = ScriptedWorld::new();
        world.accept_interactions = false;
        let tree = world.add_object("Oak tree", Tile::new(1, 0));

        let outcome = verifier().perform_and_verify(
            &mut world,
            InteractionToken::mint(1),
            &tree,
            "Chop down",
            Expectation::new(Duration::from_millis(1200), busy),
        );

        assert_eq!(outcome, ActionOutcome::Failed);
        assert_eq!(world.now, Duration::ZERO);
    }

    #[test]
    fn accepted_without_effect_times_out() {
        let mut world = ScriptedWorld::new();
        world.animate_on_harvest = false;
        let tree = world.add_object("Oak tree", Tile::new(1, 0));

        let outcome = verifier().perform_and_verify(
            &mut world,
            InteractionToken::mint(1),
            &tree,
            "Chop down",
            Expectation::new(Duration::from_millis(1200), busy),
        );

        assert_eq!(outcome, ActionOutcome::TimedOut);
        assert!(world.now >= Duration::from_millis(1200));
    }

    #[test]
    fn reset_predicate_extends_the_window() {
        let mut world = ScriptedWorld::new();
        world.animate_on_harvest = false;
        let tree = world.add_object("Oak tree", Tile::new(1, 0));
        let mut polls = 0_u32;

        let outcome = verifier().perform_and_verify(
            &mut world,
            InteractionToken::mint(1),
            &tree,
            "Chop down",
            Expectation::new(Duration::from_millis(200), busy).reset_while(|_: &ScriptedWorld| {
                polls = polls.saturating_add(1);
                polls < 10
            }),
        );

        assert_eq!(outcome, ActionOutcome::TimedOut);
        assert!(world.now > Duration::from_millis(400));
    }

    #[test]
    fn item_expectation_watches_inventory() {
        let mut world = ScriptedWorld::new();
        world.give("Oak logs", 1);
        let item = world.first_item("Oak logs").unwrap();
        let held = item.clone();

        let outcome = verifier().perform_and_verify(
            &mut world,
            InteractionToken::mint(3),
            &item,
            "Drop",
            Expectation::new(Duration::from_millis(600), move |w: &ScriptedWorld| {
                !w.holds(&held)
            }),
        );

        assert_eq!(outcome, ActionOutcome::Success);
        assert!(!world.contains("Oak logs"));
    }

    #[test]
    fn storage_entity_opens() {
        let mut world = ScriptedWorld::new();
        let facility = world.add_storage(EntityKind::Object, Tile::new(2, 2));
        let entity = facility.entity().clone();

        let outcome = verifier().perform_and_verify(
            &mut world,
            InteractionToken::mint(1),
            &entity,
            "Bank",
            Expectation::new(Duration::from_millis(2000), |w: &ScriptedWorld| w.is_storage_open()),
        );

        assert_eq!(outcome, ActionOutcome::Success);
    }
}
