//! Navigation controller: brings the agent within interaction range of a
//! destination, one step per cycle, with bounded retries and a single
//! escalated rebuild.
//!
//! # Episode lifecycle
//!
//! ```text
//! Idle --approach--> Stepping --step fails--> Stalled --budget spent--> Recalculated
//!   ^                   |  ^                     |                          |
//!   |                   |  +----step moves-------+                          |
//!   +-- Arrived / Blocked (episode discarded) <-----------------------------+
//! ```
//!
//! An episode is the transient [`NavigationAttempt`] for one target. It
//! is keyed on the anchor entity's id when there is one, otherwise on the
//! destination itself. It survives across cycles while the same target is
//! requested and is discarded on arrival, on any block, or when a
//! different target is requested. An anchor that moves (a wandering NPC)
//! keeps its episode: the goals and path are rebuilt but the retry budget,
//! stall count and escalation carry over.
//!
//! A step counts as progress only when the world accepted it and the
//! agent is moving afterwards. `stall_threshold` consecutive failures, or
//! `max_retries` failures in total, escalate the episode once: the path is
//! rebuilt with [`PathCapabilities::ESCALATED`] and the retry budget
//! restarts. Exhausting the escalated budget blocks the episode.

use lumber_types::{BlockReason, Destination, Entity, NavResult, PathCapabilities, Tile};
use tracing::{debug, info, trace, warn};

use crate::config::NavigationConfig;
use crate::world::{Navigator, Scene};

/// Thresholds for one navigation controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPolicy {
    /// Distance at which the agent counts as arrived.
    pub interaction_range: u32,
    /// Failed steps allowed per phase.
    pub max_retries: u32,
    /// Consecutive failed steps that count as a stall.
    pub stall_threshold: u32,
}

impl From<&NavigationConfig> for NavigationPolicy {
    fn from(config: &NavigationConfig) -> Self {
        Self {
            interaction_range: config.interaction_range,
            max_retries: config.max_retries,
            stall_threshold: config.stall_threshold,
        }
    }
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::from(&NavigationConfig::default())
    }
}

/// Coarse phase of the controller, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    /// No episode in progress.
    Idle,
    /// Walking, last step made progress.
    Stepping,
    /// Walking, the last step(s) did not move the agent.
    Stalled,
    /// The one escalated rebuild has been used.
    Recalculated,
}

/// Transient record of one navigation episode.
#[derive(Debug)]
pub struct NavigationAttempt<P> {
    destination: Destination,
    anchor: Option<Entity>,
    goals: Vec<Tile>,
    path: Option<P>,
    steps_taken: u32,
    retries_used: u32,
    consecutive_stalls: u32,
    recalculated: bool,
}

impl<P> NavigationAttempt<P> {
    const fn new(destination: Destination, anchor: Option<Entity>, goals: Vec<Tile>) -> Self {
        Self {
            destination,
            anchor,
            goals,
            path: None,
            steps_taken: 0,
            retries_used: 0,
            consecutive_stalls: 0,
            recalculated: false,
        }
    }

    /// Where this episode is heading.
    pub const fn destination(&self) -> &Destination {
        &self.destination
    }

    /// The entity this episode is walking to, if any.
    pub const fn anchor(&self) -> Option<&Entity> {
        self.anchor.as_ref()
    }

    /// Steps that moved the agent.
    pub const fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Failed steps in the current phase.
    pub const fn retries_used(&self) -> u32 {
        self.retries_used
    }

    /// Whether the escalated rebuild has been used.
    pub const fn recalculated(&self) -> bool {
        self.recalculated
    }

    /// The tiles the path builder is aiming for.
    pub fn goals(&self) -> &[Tile] {
        &self.goals
    }
}

/// Owns at most one navigation episode and advances it one step per call.
#[derive(Debug)]
pub struct NavigationController<P> {
    policy: NavigationPolicy,
    episode: Option<NavigationAttempt<P>>,
}

impl<P> NavigationController<P> {
    /// Create an idle controller.
    pub const fn new(policy: NavigationPolicy) -> Self {
        Self {
            policy,
            episode: None,
        }
    }

    /// The thresholds in use.
    pub const fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    /// The episode in progress, if any.
    pub const fn episode(&self) -> Option<&NavigationAttempt<P>> {
        self.episode.as_ref()
    }

    /// The current phase.
    pub fn phase(&self) -> NavPhase {
        match &self.episode {
            None => NavPhase::Idle,
            Some(episode) if episode.recalculated => NavPhase::Recalculated,
            Some(episode) if episode.consecutive_stalls > 0 => NavPhase::Stalled,
            Some(_) => NavPhase::Stepping,
        }
    }

    /// Drop the episode in progress, if any.
    pub fn abandon(&mut self) {
        if let Some(episode) = self.episode.take() {
            debug!(destination = %episode.destination, "Navigation episode abandoned");
        }
    }

    /// Move the agent towards `destination` by at most one step.
    ///
    /// `anchor` is the entity the destination belongs to; if it no longer
    /// exists the episode ends with [`BlockReason::TargetLost`]. Calling
    /// this while already in range returns [`NavResult::Arrived`] without
    /// issuing movement.
    pub fn approach<W>(
        &mut self,
        world: &mut W,
        destination: &Destination,
        anchor: Option<&Entity>,
    ) -> NavResult
    where
        W: Scene + Navigator<Path = P> + ?Sized,
    {
        let Some(agent) = world.local_agent() else {
            self.episode = None;
            return NavResult::Blocked(BlockReason::AgentMissing);
        };

        if anchor.is_some_and(|anchor| !world.is_valid(anchor)) {
            self.abandon();
            return NavResult::Blocked(BlockReason::TargetLost);
        }

        let Some(distance) = destination.distance_from(agent.position) else {
            self.episode = None;
            return NavResult::Blocked(BlockReason::NoPath);
        };

        if distance <= self.policy.interaction_range {
            if self.follows(destination, anchor)
                && let Some(episode) = self.episode.take()
            {
                debug!(destination = %destination, steps = episode.steps_taken, "Arrived");
            }
            return NavResult::Arrived;
        }

        if !self.follows(destination, anchor) {
            let goals = resolve_goals(world, destination);
            debug!(destination = %destination, distance, goals = goals.len(), "Navigation episode started");
            self.episode = Some(NavigationAttempt::new(
                destination.clone(),
                anchor.cloned(),
                goals,
            ));
        } else if let Some(episode) = self.episode.as_mut()
            && episode.destination != *destination
        {
            debug!(from = %episode.destination, to = %destination, "Target moved, retargeting");
            episode.goals = resolve_goals(world, destination);
            episode.destination = destination.clone();
            episode.anchor = anchor.cloned();
            episode.path = None;
        }

        let policy = self.policy;
        let Some(episode) = self.episode.as_mut() else {
            return NavResult::Blocked(BlockReason::NoPath);
        };

        if episode.path.is_none() {
            let capabilities = if episode.recalculated {
                PathCapabilities::ESCALATED
            } else {
                PathCapabilities::WALK
            };
            episode.path = world.build_path(agent.position, &episode.goals, capabilities);
            if episode.path.is_none() {
                warn!(destination = %destination, distance, "Unable to build a path");
                self.episode = None;
                return NavResult::Blocked(BlockReason::NoPath);
            }
        }

        let stepped = episode.path.as_mut().is_some_and(|path| world.step(path));
        let moving = world.local_agent().is_some_and(|status| status.moving);

        if stepped && moving {
            episode.steps_taken = episode.steps_taken.saturating_add(1);
            episode.consecutive_stalls = 0;
            trace!(destination = %destination, steps = episode.steps_taken, "Stepped");
            return NavResult::Progressed;
        }

        episode.retries_used = episode.retries_used.saturating_add(1);
        episode.consecutive_stalls = episode.consecutive_stalls.saturating_add(1);

        if episode.consecutive_stalls < policy.stall_threshold
            && episode.retries_used < policy.max_retries
        {
            debug!(
                destination = %destination,
                stalls = episode.consecutive_stalls,
                retries = episode.retries_used,
                "Not moving"
            );
            return NavResult::Progressed;
        }

        if episode.recalculated {
            warn!(
                destination = %destination,
                retries = episode.retries_used,
                "Escalated path exhausted its retries"
            );
            self.episode = None;
            return NavResult::Blocked(BlockReason::Exhausted);
        }

        info!(
            destination = %destination,
            stalls = episode.consecutive_stalls,
            retries = episode.retries_used,
            "Stalled, recalculating path with shortcuts"
        );
        episode.recalculated = true;
        episode.retries_used = 0;
        episode.consecutive_stalls = 0;
        episode.path = world.build_path(agent.position, &episode.goals, PathCapabilities::ESCALATED);
        if episode.path.is_none() {
            warn!(destination = %destination, "Escalated path could not be built");
            self.episode = None;
            return NavResult::Blocked(BlockReason::NoPath);
        }
        NavResult::Progressed
    }

    /// Whether the episode in progress is for this target: the same
    /// anchor entity, or the same destination when either has no anchor.
    fn follows(&self, destination: &Destination, anchor: Option<&Entity>) -> bool {
        self.episode
            .as_ref()
            .is_some_and(|episode| match (&episode.anchor, anchor) {
                (Some(current), Some(anchor)) => current.id == anchor.id,
                _ => episode.destination == *destination,
            })
    }
}

/// Goal tiles for a destination: its own walkable tiles, or the ring
/// around it when none of them can be stood on.
fn resolve_goals<W>(world: &W, destination: &Destination) -> Vec<Tile>
where
    W: Navigator + ?Sized,
{
    let direct: Vec<Tile> = destination
        .goal_tiles()
        .into_iter()
        .filter(|tile| world.is_traversable(*tile))
        .collect();
    if !direct.is_empty() {
        return direct;
    }

    let ring = destination.surrounding_tiles();
    let walkable: Vec<Tile> = ring
        .iter()
        .copied()
        .filter(|tile| world.is_traversable(*tile))
        .collect();
    if walkable.is_empty() { ring } else { walkable }
}
