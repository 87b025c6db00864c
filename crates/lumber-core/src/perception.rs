//! Per-cycle perception: one fresh [`WorldSnapshot`] at the top of every
//! cycle.
//!
//! Snapshots are never cached. An entity seen last cycle may have been
//! depleted, moved, or despawned since.

use lumber_types::{Entity, Sighting, WorldSnapshot};

use crate::world::{Inventory, Scene};

/// Builds snapshots and sightings relative to the local agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Perception {
    min_visibility: u8,
}

impl Perception {
    /// Entities at or above `min_visibility` percent count as visible.
    pub const fn new(min_visibility: u8) -> Self {
        Self { min_visibility }
    }

    /// Observe the agent, the inventory, and the nearest entity named
    /// `resource_name`.
    pub fn observe<W>(&self, world: &W, resource_name: &str) -> WorldSnapshot
    where
        W: Scene + Inventory + ?Sized,
    {
        let agent = world.local_agent();
        let sighting = world
            .nearest_entity(resource_name)
            .map(|entity| self.sight(world, entity));
        WorldSnapshot {
            agent,
            inventory_full: world.is_full(),
            sighting,
        }
    }

    /// Describe `entity` as seen from the agent's current position.
    ///
    /// With no agent loaded the distance saturates to `u32::MAX`.
    pub fn sight<W>(&self, world: &W, entity: Entity) -> Sighting
    where
        W: Scene + ?Sized,
    {
        let distance = world
            .local_agent()
            .map_or(u32::MAX, |agent| entity.distance_from(agent.position));
        let visible = entity.visibility >= self.min_visibility;
        Sighting {
            entity,
            distance,
            visible,
        }
    }
}
