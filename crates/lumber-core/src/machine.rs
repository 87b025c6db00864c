//! The agent state machine: owns the current [`AgentMode`] and decides the
//! single action taken each cycle.
//!
//! ```text
//!              inventory full (drop)            no yield items
//!  Harvesting -----------------------> Discarding -------------> Harvesting
//!      |       inventory full (bank)            deposited / no yield items
//!      +-----------------------------> Storing    -------------> Harvesting
//! ```
//!
//! The mode is private; [`AgentStateMachine::run_cycle`] is the only path
//! that mutates it, and every change goes through one `transition` call so
//! it is logged exactly once.
//!
//! Each cycle mints one [`InteractionToken`]. Handlers either spend it on
//! the interaction verifier or drop it unused.

use std::time::Duration;

use lumber_types::{ActionOutcome, AgentMode, DisposalMode, Entity, NavResult, TargetSpec};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::config::{LumberConfig, TimingConfig};
use crate::error::CycleFault;
use crate::interaction::{Expectation, InteractionToken, InteractionVerifier};
use crate::navigation::{NavigationController, NavigationPolicy};
use crate::perception::Perception;
use crate::report::{CycleAction, CycleReport};
use crate::storage::{OPEN_STORAGE_ACTION, OpensStorage, RemoteStorage, StorageFacility};
use crate::wait::WaitPolicy;
use crate::world::{GameWorld, Navigator};

/// Interaction label that drops a held item.
pub const DISCARD_ACTION: &str = "Drop";

/// Label used in faults for the deposit primitive.
const DEPOSIT_ACTION: &str = "Deposit inventory";

/// What one handler did, before it is stamped into a [`CycleReport`].
#[derive(Debug)]
struct Step {
    action: CycleAction,
    fault: Option<CycleFault>,
    interactions: u8,
}

impl Step {
    const fn new(action: CycleAction) -> Self {
        Self {
            action,
            fault: None,
            interactions: if action.interacted() { 1 } else { 0 },
        }
    }

    const fn idle() -> Self {
        Self::new(CycleAction::Idle)
    }

    const fn transitioned() -> Self {
        Self::new(CycleAction::Transitioned)
    }

    fn fault(fault: CycleFault) -> Self {
        Self::new(CycleAction::Idle).with_fault(Some(fault))
    }

    fn walked(result: NavResult, target: &str) -> Self {
        let fault = match result {
            NavResult::Blocked(reason) => Some(CycleFault::NavigationBlocked {
                target: target.to_owned(),
                reason,
            }),
            NavResult::Arrived | NavResult::Progressed => None,
        };
        Self::new(CycleAction::Walked(result)).with_fault(fault)
    }

    fn with_fault(mut self, fault: Option<CycleFault>) -> Self {
        self.fault = fault;
        self
    }
}

/// Map a verifier outcome onto the fault taxonomy.
fn outcome_fault(
    outcome: ActionOutcome,
    action: &str,
    target: &str,
    timeout: Duration,
) -> Option<CycleFault> {
    match outcome {
        ActionOutcome::Success => None,
        ActionOutcome::Failed => Some(CycleFault::InteractionRejected {
            action: action.to_owned(),
            target: target.to_owned(),
        }),
        ActionOutcome::TimedOut => Some(CycleFault::ConfirmationTimeout {
            action: action.to_owned(),
            target: target.to_owned(),
            timeout,
        }),
    }
}

fn agent_busy<W: GameWorld>(world: &W) -> bool {
    world.local_agent().is_some_and(|agent| agent.is_busy())
}

fn agent_moving<W: GameWorld>(world: &W) -> bool {
    world.local_agent().is_some_and(|agent| agent.moving)
}

/// Harvest / discard / store state machine.
///
/// Generic over the world's path type so the navigation episode can own
/// the path it built across cycles.
#[derive(Debug)]
pub struct AgentStateMachine<P> {
    mode: AgentMode,
    target: TargetSpec,
    disposal: DisposalMode,
    timing: TimingConfig,
    perception: Perception,
    navigation: NavigationController<P>,
    wait: WaitPolicy,
    verifier: InteractionVerifier,
    rng: StdRng,
}

impl<P> AgentStateMachine<P> {
    /// Build a machine from configuration.
    ///
    /// The initial mode is the disposal mode's unload state: a session
    /// always starts by emptying whatever yield it is already carrying.
    pub fn new(config: &LumberConfig) -> Self {
        let wait = WaitPolicy::new(config.timing.poll_interval());
        let disposal = config.disposal.mode;
        Self {
            mode: disposal.unload_mode(),
            target: config.target.spec(),
            disposal,
            timing: config.timing.clone(),
            perception: Perception::new(config.navigation.min_visibility),
            navigation: NavigationController::new(NavigationPolicy::from(&config.navigation)),
            wait,
            verifier: InteractionVerifier::new(wait),
            rng: StdRng::seed_from_u64(config.timing.seed),
        }
    }

    /// The current mode.
    pub const fn mode(&self) -> AgentMode {
        self.mode
    }

    /// What this machine harvests.
    pub const fn target(&self) -> &TargetSpec {
        &self.target
    }

    /// The configured disposal mode.
    pub const fn disposal(&self) -> DisposalMode {
        self.disposal
    }

    /// The navigation controller, for inspection.
    pub const fn navigation(&self) -> &NavigationController<P> {
        &self.navigation
    }

    /// Decide and execute this cycle's single action.
    pub fn run_cycle<W>(&mut self, world: &mut W, cycle: u64) -> CycleReport
    where
        W: GameWorld + Navigator<Path = P>,
    {
        let mode_before = self.mode;
        let token = InteractionToken::mint(cycle);

        let step = if world.local_agent().is_none() {
            self.navigation.abandon();
            Step::fault(CycleFault::missing("local agent"))
        } else {
            match mode_before {
                AgentMode::Harvesting => self.harvest(world, token),
                AgentMode::Discarding => self.discard(world, token),
                AgentMode::Storing => self.store(world, token),
            }
        };

        if let Some(fault) = &step.fault {
            fault.log(cycle);
        }
        debug!(
            cycle,
            mode = %mode_before,
            action = %step.action,
            interactions = step.interactions,
            "Cycle complete"
        );

        CycleReport {
            cycle,
            mode_before,
            mode_after: self.mode,
            action: step.action,
            fault: step.fault,
            interactions: step.interactions,
        }
    }

    /// The entity the navigation episode is walking to, when `seen` is a
    /// different entity of the same name and the one being walked to still
    /// exists. A tie for nearest must not restart the retry budget.
    fn keep_course<W>(&self, world: &W, seen: &Entity) -> Option<Entity>
    where
        W: GameWorld + ?Sized,
    {
        let current = self.navigation.episode()?.anchor()?;
        (current.id != seen.id && current.name == seen.name && world.is_valid(current))
            .then(|| current.clone())
    }

    fn transition(&mut self, next: AgentMode, reason: &'static str) {
        if self.mode == next {
            return;
        }
        info!(from = %self.mode, to = %next, reason, "Mode transition");
        self.mode = next;
    }

    fn harvest<W>(&mut self, world: &mut W, token: InteractionToken) -> Step
    where
        W: GameWorld + Navigator<Path = P>,
    {
        let snapshot = self.perception.observe(&*world, &self.target.resource_name);

        if snapshot.inventory_full {
            self.navigation.abandon();
            self.transition(self.disposal.unload_mode(), "inventory full");
            return Step::transitioned();
        }

        let Some(agent) = snapshot.agent else {
            return Step::fault(CycleFault::missing("local agent"));
        };
        let Some(mut sighting) = snapshot.sighting else {
            return Step::fault(CycleFault::not_found(self.target.resource_name.clone()));
        };
        if agent.is_busy() {
            trace!(target_name = %sighting.entity.name, "Already harvesting");
            return Step::idle();
        }

        if sighting.distance > self.navigation.policy().interaction_range
            && let Some(kept) = self.keep_course(&*world, &sighting.entity)
        {
            sighting = self.perception.sight(&*world, kept);
        }

        let tree = sighting.entity;
        if sighting.distance > self.navigation.policy().interaction_range {
            debug!(target_name = %tree.name, distance = sighting.distance, "Walking towards resource");
            let result = self.navigation.approach(world, &tree.destination(), Some(&tree));
            return Step::walked(result, &tree.name);
        }

        self.navigation.abandon();
        if !sighting.visible {
            world.turn_to_concurrently(&tree);
        }

        let timeout = self.timing.harvest_confirm();
        let action = &self.target.harvest_action;
        let expectation = Expectation::new(timeout, agent_busy::<W>).reset_while(agent_moving::<W>);
        let outcome = self
            .verifier
            .perform_and_verify(world, token, &tree, action, expectation);
        if outcome.is_success() {
            info!(target_name = %tree.name, "Harvesting");
        }

        Step::new(CycleAction::Harvested(outcome))
            .with_fault(outcome_fault(outcome, action, &tree.name, timeout))
    }

    fn discard<W>(&mut self, world: &mut W, token: InteractionToken) -> Step
    where
        W: GameWorld + Navigator<Path = P>,
    {
        let Some(item) = world.first_item(&self.target.yield_name) else {
            self.transition(AgentMode::Harvesting, "no yield items left");
            return Step::transitioned();
        };

        let timeout = self.timing.discard_confirm();
        let held = item.clone();
        let expectation = Expectation::new(timeout, move |w: &W| !w.holds(&held));
        let outcome = self
            .verifier
            .perform_and_verify(world, token, &item, DISCARD_ACTION, expectation);
        if outcome.is_success() {
            debug!(item = %item.name, slot = item.slot, "Dropped");
        }

        Step::new(CycleAction::Discarded(outcome))
            .with_fault(outcome_fault(outcome, DISCARD_ACTION, &item.name, timeout))
    }

    fn store<W>(&mut self, world: &mut W, token: InteractionToken) -> Step
    where
        W: GameWorld + Navigator<Path = P>,
    {
        if world.is_storage_open() {
            debug!("Storage already open, depositing");
            return self.deposit_and_close(world, 0);
        }

        if !world.contains(&self.target.yield_name) {
            self.navigation.abandon();
            self.transition(AgentMode::Harvesting, "no yield items left");
            return Step::transitioned();
        }

        let Some(mut facility) = world.nearest_storage() else {
            return Step::fault(CycleFault::not_found("storage facility"));
        };
        if let Some(kept) = self.keep_course(&*world, facility.entity()) {
            facility = StorageFacility::from_entity(kept);
        }
        let entity = facility.entity().clone();

        match self
            .navigation
            .approach(world, &facility.destination(), Some(&entity))
        {
            NavResult::Arrived => {}
            NavResult::Blocked(reason) if reason.is_terminal() => {
                return self.open_remote(world, token, &entity.name, NavResult::Blocked(reason));
            }
            result => return Step::walked(result, &entity.name),
        }

        if !self.perception.sight(&*world, entity.clone()).visible {
            if !world.turn_to(&entity) {
                debug!(facility = %entity.name, "Camera turn not issued");
            }
            let settled = self.wait.pause(
                world,
                &mut self.rng,
                self.timing.camera_settle_min_ms,
                self.timing.camera_settle_max_ms,
            );
            trace!(?settled, "Camera settled on storage");
        }

        let timeout = self.timing.storage_open();
        let action = facility.open_action();
        let expectation = Expectation::new(timeout, |w: &W| w.is_storage_open())
            .reset_while(agent_moving::<W>);
        let outcome = self
            .verifier
            .perform_and_verify(world, token, &entity, action, expectation);

        if outcome.is_success() {
            return self.deposit_and_close(world, 1);
        }
        Step::new(CycleAction::OpenedStorage(outcome))
            .with_fault(outcome_fault(outcome, action, &entity.name, timeout))
    }

    /// Last resort once walking to storage has been given up: open storage
    /// directly without standing next to it.
    fn open_remote<W>(
        &mut self,
        world: &mut W,
        token: InteractionToken,
        facility_name: &str,
        blocked: NavResult,
    ) -> Step
    where
        W: GameWorld + Navigator<Path = P>,
    {
        warn!(facility = facility_name, ?blocked, "Storage unreachable, trying a direct open");

        let expectation =
            Expectation::new(self.timing.storage_open(), |w: &W| w.is_storage_open());
        let outcome = self.verifier.perform_and_verify(
            world,
            token,
            &RemoteStorage,
            OPEN_STORAGE_ACTION,
            expectation,
        );

        if outcome.is_success() {
            return self.deposit_and_close(world, 1);
        }
        let fault = match blocked {
            NavResult::Blocked(reason) => Some(CycleFault::NavigationBlocked {
                target: facility_name.to_owned(),
                reason,
            }),
            NavResult::Arrived | NavResult::Progressed => None,
        };
        Step::new(CycleAction::RemoteStorage(outcome)).with_fault(fault)
    }

    fn deposit_and_close<W>(&mut self, world: &mut W, interactions: u8) -> Step
    where
        W: GameWorld + Navigator<Path = P>,
    {
        let items = world.count(&self.target.yield_name);
        if !world.deposit_inventory() {
            return Step {
                action: CycleAction::Idle,
                fault: Some(CycleFault::InteractionRejected {
                    action: DEPOSIT_ACTION.to_owned(),
                    target: "open storage".to_owned(),
                }),
                interactions,
            };
        }

        let paused = self.wait.pause(
            world,
            &mut self.rng,
            self.timing.deposit_pause_min_ms,
            self.timing.deposit_pause_max_ms,
        );
        if !world.close_storage() {
            warn!("Storage interface did not close");
        }
        info!(items, ?paused, "Deposited yield");
        self.navigation.abandon();
        self.transition(AgentMode::Harvesting, "inventory deposited");

        Step {
            action: CycleAction::Deposited { items },
            fault: None,
            interactions,
        }
    }
}
