//! What one cycle did, and running totals for the session.

use std::fmt;

use lumber_types::{ActionOutcome, AgentMode, NavResult};

use crate::error::CycleFault;

/// The single thing a cycle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleAction {
    /// Nothing to do this cycle (agent busy, nothing found, or a fault).
    Idle,
    /// Only the mode changed.
    Transitioned,
    /// One navigation step towards a target.
    Walked(NavResult),
    /// The harvest interaction was issued.
    Harvested(ActionOutcome),
    /// A yield item drop was issued.
    Discarded(ActionOutcome),
    /// The open-storage interaction was issued at a facility.
    OpenedStorage(ActionOutcome),
    /// The direct remote open was issued after navigation gave up.
    RemoteStorage(ActionOutcome),
    /// The inventory was deposited into open storage.
    Deposited {
        /// Yield stacks held before the deposit.
        items: u32,
    },
}

impl CycleAction {
    /// Whether this action issued an interaction.
    pub const fn interacted(self) -> bool {
        matches!(
            self,
            Self::Harvested(_) | Self::Discarded(_) | Self::OpenedStorage(_) | Self::RemoteStorage(_)
        )
    }
}

impl fmt::Display for CycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Transitioned => write!(f, "transitioned"),
            Self::Walked(result) => write!(f, "walked ({result:?})"),
            Self::Harvested(outcome) => write!(f, "harvest ({outcome:?})"),
            Self::Discarded(outcome) => write!(f, "drop ({outcome:?})"),
            Self::OpenedStorage(outcome) => write!(f, "open storage ({outcome:?})"),
            Self::RemoteStorage(outcome) => write!(f, "remote storage ({outcome:?})"),
            Self::Deposited { items } => write!(f, "deposited {items}"),
        }
    }
}

/// Summary of one `advance()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// Mode at the top of the cycle.
    pub mode_before: AgentMode,
    /// Mode after the cycle.
    pub mode_after: AgentMode,
    /// What the cycle did.
    pub action: CycleAction,
    /// The recoverable failure observed, if any.
    pub fault: Option<CycleFault>,
    /// Interactions issued this cycle (0 or 1).
    pub interactions: u8,
}

impl CycleReport {
    /// Whether the mode changed during the cycle.
    pub fn transitioned(&self) -> bool {
        self.mode_before != self.mode_after
    }
}

/// Running totals across a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Cycles run since start was confirmed.
    pub cycles: u64,
    /// Harvest interactions issued.
    pub harvest_attempts: u64,
    /// Drops confirmed.
    pub items_discarded: u64,
    /// Yield stacks deposited.
    pub items_deposited: u64,
    /// Navigation episodes that ended blocked, including those that fell
    /// back to a remote storage open.
    pub blocked_navigations: u64,
    /// Cycles that recorded a fault.
    pub faults: u64,
}

impl SessionStats {
    /// Fold one cycle into the totals.
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles = self.cycles.saturating_add(1);
        if report.fault.is_some() {
            self.faults = self.faults.saturating_add(1);
        }
        if matches!(report.fault, Some(CycleFault::NavigationBlocked { .. })) {
            self.blocked_navigations = self.blocked_navigations.saturating_add(1);
        }
        match report.action {
            CycleAction::Harvested(_) => {
                self.harvest_attempts = self.harvest_attempts.saturating_add(1);
            }
            CycleAction::Discarded(ActionOutcome::Success) => {
                self.items_discarded = self.items_discarded.saturating_add(1);
            }
            CycleAction::Deposited { items } => {
                self.items_deposited = self.items_deposited.saturating_add(u64::from(items));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use lumber_types::BlockReason;

    use super::*;

    fn report(action: CycleAction, fault: Option<CycleFault>) -> CycleReport {
        CycleReport {
            cycle: 1,
            mode_before: AgentMode::Harvesting,
            mode_after: AgentMode::Harvesting,
            action,
            fault,
            interactions: u8::from(action.interacted()),
        }
    }

    #[test]
    fn stats_fold_cycle_actions() {
        let mut stats = SessionStats::default();
        stats.record(&report(CycleAction::Harvested(ActionOutcome::TimedOut), None));
        stats.record(&report(CycleAction::Discarded(ActionOutcome::Success), None));
        stats.record(&report(CycleAction::Discarded(ActionOutcome::Failed), None));
        stats.record(&report(CycleAction::Deposited { items: 27 }, None));
        stats.record(&report(
            CycleAction::Walked(NavResult::Blocked(BlockReason::NoPath)),
            Some(CycleFault::NavigationBlocked {
                target: "Oak tree".to_owned(),
                reason: BlockReason::NoPath,
            }),
        ));

        stats.record(&report(
            CycleAction::RemoteStorage(ActionOutcome::Failed),
            Some(CycleFault::NavigationBlocked {
                target: "Bank booth".to_owned(),
                reason: BlockReason::Exhausted,
            }),
        ));
        stats.record(&report(
            CycleAction::Idle,
            Some(CycleFault::missing("local agent")),
        ));

        assert_eq!(stats.cycles, 7);
        assert_eq!(stats.harvest_attempts, 1);
        assert_eq!(stats.items_discarded, 1);
        assert_eq!(stats.items_deposited, 27);
        assert_eq!(stats.blocked_navigations, 2);
        assert_eq!(stats.faults, 3);
    }

    #[test]
    fn only_interactions_count() {
        assert!(CycleAction::RemoteStorage(ActionOutcome::Failed).interacted());
        assert!(!CycleAction::Deposited { items: 3 }.interacted());
        assert!(!CycleAction::Walked(NavResult::Progressed).interacted());
    }
}
