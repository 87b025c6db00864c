//! Harvestable trees: a finite supply of logs per tree, then a stump that
//! regrows after a delay.
//!
//! A regrown tree is a new scene entity with a fresh id, so anything still
//! holding the old entity sees it as no longer valid.

use std::time::Duration;

use lumber_types::{Area, Entity, EntityId, EntityKind, Tile};

/// One tree in the sandbox.
#[derive(Debug, Clone)]
pub struct TreeNode {
    entity: Entity,
    log_name: String,
    logs_left: u32,
    regrows_at: Option<Duration>,
}

impl TreeNode {
    /// A standing tree named `name` at `tile` that yields `log_name`.
    pub fn new(name: &str, log_name: &str, tile: Tile, logs: u32, visibility: u8) -> Self {
        Self {
            entity: Entity {
                id: EntityId::new(),
                name: name.to_owned(),
                kind: EntityKind::Object,
                area: Area::single(tile),
                visibility,
            },
            log_name: log_name.to_owned(),
            logs_left: logs,
            regrows_at: None,
        }
    }

    /// The scene entity, present only while the tree is standing.
    pub const fn entity(&self) -> Option<&Entity> {
        if self.is_standing() {
            Some(&self.entity)
        } else {
            None
        }
    }

    /// Mutable access to the entity regardless of state (camera updates).
    pub const fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    /// The tile the trunk occupies.
    pub const fn tile(&self) -> Tile {
        self.entity.area.min
    }

    /// Item produced per successful chop.
    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    /// Whether the tree can be chopped.
    pub const fn is_standing(&self) -> bool {
        self.regrows_at.is_none()
    }

    /// Logs remaining before the tree falls.
    pub const fn logs_left(&self) -> u32 {
        self.logs_left
    }

    /// Take one log. Fells the tree when the last log is taken, scheduling
    /// regrowth at `now + regrow`. Returns whether a log was produced.
    pub fn chop(&mut self, now: Duration, regrow: Duration) -> bool {
        if !self.is_standing() || self.logs_left == 0 {
            return false;
        }
        self.logs_left = self.logs_left.saturating_sub(1);
        if self.logs_left == 0 {
            self.regrows_at = Some(now.saturating_add(regrow));
        }
        true
    }

    /// Whether the stump timer has elapsed at `now`.
    pub fn is_due(&self, now: Duration) -> bool {
        self.regrows_at.is_some_and(|at| now >= at)
    }

    /// Regrow the tree with `logs` logs if its stump timer has elapsed.
    /// Returns whether it regrew.
    pub fn regrow_if_due(&mut self, now: Duration, logs: u32) -> bool {
        match self.regrows_at {
            Some(at) if now >= at => {
                self.regrows_at = None;
                self.logs_left = logs.max(1);
                self.entity.id = EntityId::new();
                true
            }
            _ => false,
        }
    }
}
