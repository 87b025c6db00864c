//! Scripted in-memory world for unit tests.
//!
//! Every collaborator trait is implemented with plain fields and switches
//! so a test can set up exactly the situation it needs and then inspect
//! what the core asked the world to do.

use std::collections::BTreeSet;
use std::time::Duration;

use lumber_types::{
    AgentStatus, Area, Entity, EntityId, EntityKind, Item, ItemId, PathCapabilities, Tile,
};

use crate::storage::{RemoteStorage, StorageFacility};
use crate::world::{Camera, GameClock, Interact, Inventory, Navigator, Scene, StorageAccess};

/// One recorded interaction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Name of the target.
    pub target: String,
    /// Interaction label.
    pub action: String,
}

/// A world whose every reaction is a test-controlled switch.
#[derive(Debug)]
pub struct ScriptedWorld {
    pub now: Duration,
    pub agent: Option<AgentStatus>,
    pub entities: Vec<Entity>,
    pub items: Vec<Item>,
    pub capacity: usize,
    pub blocked: BTreeSet<Tile>,
    pub storage: Option<StorageFacility>,
    pub storage_open: bool,

    pub accept_interactions: bool,
    pub animate_on_harvest: bool,
    pub remove_on_drop: bool,
    pub open_on_bank: bool,
    pub remote_storage: bool,
    pub deposit_works: bool,
    pub walk_path: bool,
    pub teleport_path: bool,
    pub steps_move: bool,

    pub requests: Vec<Request>,
    pub path_builds: Vec<PathCapabilities>,
    pub steps: u32,
    pub concurrent_turns: u32,
    pub blocking_turns: u32,
    pub deposits: u32,
    pub closes: u32,
}

impl ScriptedWorld {
    /// An idle agent at the origin with an empty 28-slot inventory.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            agent: Some(AgentStatus {
                position: Tile::new(0, 0),
                animating: false,
                moving: false,
            }),
            entities: Vec::new(),
            items: Vec::new(),
            capacity: 28,
            blocked: BTreeSet::new(),
            storage: None,
            storage_open: false,
            accept_interactions: true,
            animate_on_harvest: true,
            remove_on_drop: true,
            open_on_bank: true,
            remote_storage: false,
            deposit_works: true,
            walk_path: true,
            teleport_path: true,
            steps_move: true,
            requests: Vec::new(),
            path_builds: Vec::new(),
            steps: 0,
            concurrent_turns: 0,
            blocking_turns: 0,
            deposits: 0,
            closes: 0,
        }
    }

    /// Place a single-tile, unwalkable object and return it.
    pub fn add_object(&mut self, name: &str, tile: Tile) -> Entity {
        self.add_entity(name, EntityKind::Object, tile)
    }

    /// Place a single-tile entity of the given kind and return it.
    pub fn add_entity(&mut self, name: &str, kind: EntityKind, tile: Tile) -> Entity {
        let entity = Entity {
            id: EntityId::new(),
            name: name.to_owned(),
            kind,
            area: Area::single(tile),
            visibility: 100,
        };
        self.blocked.insert(tile);
        self.entities.push(entity.clone());
        entity
    }

    /// Add a storage facility and return it.
    pub fn add_storage(&mut self, kind: EntityKind, tile: Tile) -> StorageFacility {
        let entity = self.add_entity("Bank booth", kind, tile);
        let facility = StorageFacility::from_entity(entity);
        self.storage = Some(facility.clone());
        facility
    }

    /// Put `count` stacks named `name` into the inventory.
    pub fn give(&mut self, name: &str, count: usize) {
        for _ in 0..count {
            let slot = u8::try_from(self.items.len()).unwrap_or(u8::MAX);
            self.items.push(Item {
                id: ItemId::new(),
                name: name.to_owned(),
                slot,
            });
        }
    }

    /// Fill every free slot with `name`.
    pub fn fill(&mut self, name: &str) {
        let free = self.capacity.saturating_sub(self.items.len());
        self.give(name, free);
    }

    /// Move the agent to `tile`.
    pub fn place_agent(&mut self, tile: Tile) {
        if let Some(agent) = self.agent.as_mut() {
            agent.position = tile;
        }
    }

    /// The agent's current position.
    pub fn agent_position(&self) -> Tile {
        self.agent.map_or(Tile::new(0, 0), |agent| agent.position)
    }

    fn record(&mut self, target: &str, action: &str) {
        self.requests.push(Request {
            target: target.to_owned(),
            action: action.to_owned(),
        });
    }
}

impl GameClock for ScriptedWorld {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now = self.now.saturating_add(duration);
        if let Some(agent) = self.agent.as_mut() {
            agent.moving = false;
        }
    }
}

impl Scene for ScriptedWorld {
    fn local_agent(&self) -> Option<AgentStatus> {
        self.agent
    }

    fn nearest_entity(&self, name: &str) -> Option<Entity> {
        let from = self.agent_position();
        self.entities
            .iter()
            .filter(|entity| entity.name == name)
            .min_by_key(|entity| entity.distance_from(from))
            .cloned()
    }

    fn is_valid(&self, entity: &Entity) -> bool {
        self.entities.iter().any(|e| e.id == entity.id)
    }
}

impl Inventory for ScriptedWorld {
    fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    fn count(&self, name: &str) -> u32 {
        let held = self.items.iter().filter(|item| item.name == name).count();
        u32::try_from(held).unwrap_or(u32::MAX)
    }

    fn first_item(&self, name: &str) -> Option<Item> {
        self.items
            .iter()
            .filter(|item| item.name == name)
            .min_by_key(|item| item.slot)
            .cloned()
    }

    fn holds(&self, item: &Item) -> bool {
        self.items.iter().any(|held| held.id == item.id)
    }
}

impl Interact<Entity> for ScriptedWorld {
    fn interact(&mut self, target: &Entity, action: &str) -> bool {
        self.record(&target.name, action);
        if !self.accept_interactions {
            return false;
        }
        if action == "Bank" {
            if self.open_on_bank {
                self.storage_open = true;
            }
        } else if self.animate_on_harvest {
            if let Some(agent) = self.agent.as_mut() {
                agent.animating = true;
            }
        }
        true
    }
}

impl Interact<Item> for ScriptedWorld {
    fn interact(&mut self, target: &Item, action: &str) -> bool {
        self.record(&target.name, action);
        if !self.accept_interactions {
            return false;
        }
        if self.remove_on_drop {
            self.items.retain(|item| item.id != target.id);
        }
        true
    }
}

impl Interact<RemoteStorage> for ScriptedWorld {
    fn interact(&mut self, _target: &RemoteStorage, action: &str) -> bool {
        self.record("remote storage", action);
        if !self.remote_storage {
            return false;
        }
        self.storage_open = true;
        true
    }
}

impl Navigator for ScriptedWorld {
    type Path = Vec<Tile>;

    fn is_traversable(&self, tile: Tile) -> bool {
        !self.blocked.contains(&tile)
    }

    fn build_path(
        &mut self,
        from: Tile,
        goals: &[Tile],
        capabilities: PathCapabilities,
    ) -> Option<Self::Path> {
        self.path_builds.push(capabilities);
        let allowed = if capabilities.teleports {
            self.teleport_path
        } else {
            self.walk_path
        };
        if !allowed {
            return None;
        }
        let goal = goals.iter().copied().min_by_key(|goal| from.distance_to(*goal))?;
        let mut path = Vec::new();
        let mut at = from;
        while at != goal {
            at = at.step_toward(goal);
            path.push(at);
        }
        Some(path)
    }

    fn step(&mut self, path: &mut Self::Path) -> bool {
        self.steps = self.steps.saturating_add(1);
        if path.is_empty() {
            return false;
        }
        if self.steps_move {
            let next = path.remove(0);
            if let Some(agent) = self.agent.as_mut() {
                agent.position = next;
                agent.moving = true;
            }
        }
        true
    }
}

impl Camera for ScriptedWorld {
    fn turn_to_concurrently(&mut self, _entity: &Entity) {
        self.concurrent_turns = self.concurrent_turns.saturating_add(1);
    }

    fn turn_to(&mut self, _entity: &Entity) -> bool {
        self.blocking_turns = self.blocking_turns.saturating_add(1);
        true
    }
}

impl StorageAccess for ScriptedWorld {
    fn nearest_storage(&self) -> Option<StorageFacility> {
        self.storage.clone()
    }

    fn is_storage_open(&self) -> bool {
        self.storage_open
    }

    fn deposit_inventory(&mut self) -> bool {
        if !self.storage_open || !self.deposit_works {
            return false;
        }
        self.items.clear();
        self.deposits = self.deposits.saturating_add(1);
        true
    }

    fn close_storage(&mut self) -> bool {
        self.storage_open = false;
        self.closes = self.closes.saturating_add(1);
        true
    }
}

impl Default for ScriptedWorld {
    fn default() -> Self {
        Self::new()
    }
}
