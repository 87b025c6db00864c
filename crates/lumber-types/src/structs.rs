//! Core structs: scene entities, inventory items, the agent's own status,
//! the harvesting target, and the per-cycle world snapshot.

use serde::{Deserialize, Serialize};

use crate::enums::{EntityKind, TreeType};
use crate::geometry::{Area, Destination, Tile};
use crate::ids::{EntityId, ItemId};

/// Interaction label used to harvest a tree.
pub const DEFAULT_HARVEST_ACTION: &str = "Chop down";

/// A scene entity as returned by a nearest-entity query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identity of the entity while it exists.
    pub id: EntityId,
    /// Scene name (e.g. "Oak tree", "Bank booth").
    pub name: String,
    /// Object or NPC.
    pub kind: EntityKind,
    /// Footprint on the grid.
    pub area: Area,
    /// Percentage of the entity that is on screen (0-100).
    pub visibility: u8,
}

impl Entity {
    /// The entity's footprint as a navigation destination.
    pub const fn destination(&self) -> Destination {
        Destination::Area(self.area)
    }

    /// Chebyshev distance from `tile` to the entity's footprint.
    pub const fn distance_from(&self, tile: Tile) -> u32 {
        self.area.distance_from(tile)
    }
}

/// An item stack in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity of the stack while it is held.
    pub id: ItemId,
    /// Item name (e.g. "Oak logs").
    pub name: String,
    /// Inventory slot index.
    pub slot: u8,
}

/// The local agent's own observable status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    /// Tile the agent is standing on.
    pub position: Tile,
    /// Whether an activity animation is playing.
    pub animating: bool,
    /// Whether the agent is walking.
    pub moving: bool,
}

impl AgentStatus {
    /// The agent is busy whenever an activity animation is playing.
    pub const fn is_busy(&self) -> bool {
        self.animating
    }
}

/// What the agent harvests and what the harvest yields.
///
/// Selected once from configuration at start and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Scene name of the resource (e.g. "Oak tree").
    pub resource_name: String,
    /// Inventory name of the yield item (e.g. "Oak logs").
    pub yield_name: String,
    /// Interaction label that starts harvesting.
    pub harvest_action: String,
}

impl From<TreeType> for TargetSpec {
    fn from(tree: TreeType) -> Self {
        Self {
            resource_name: tree.tree_name().to_owned(),
            yield_name: tree.log_name().to_owned(),
            harvest_action: DEFAULT_HARVEST_ACTION.to_owned(),
        }
    }
}

/// Extra movement capabilities a path builder may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathCapabilities {
    /// Allow teleport-class shortcuts.
    pub teleports: bool,
}

impl PathCapabilities {
    /// Plain walking only.
    pub const WALK: Self = Self { teleports: false };

    /// The expanded set used for the one escalated rebuild.
    pub const ESCALATED: Self = Self { teleports: true };
}

/// An entity as seen from the agent's position this cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sighting {
    /// The entity.
    pub entity: Entity,
    /// Distance from the agent to the entity's footprint.
    pub distance: u32,
    /// Whether enough of the entity is on screen to click it.
    pub visible: bool,
}

/// Everything the decision core observed at the top of one cycle.
///
/// Rebuilt every cycle and never cached: the world changes between cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// The local agent, if the client currently has one.
    pub agent: Option<AgentStatus>,
    /// Whether the inventory has no free slots.
    pub inventory_full: bool,
    /// The nearest matching entity, if any.
    pub sighting: Option<Sighting>,
}
