//! The sandbox world: a virtual clock, one agent, trees, storage, and a
//! slot inventory, implementing every collaborator trait of the core.
//!
//! Time only moves when someone sleeps on the clock (the core's timed
//! waits) or the host calls [`Sandbox::advance`]. Everything that happens
//! over time (chopping, walking, storage opening, regrowth) is resolved
//! lazily when the clock moves, so runs are fully deterministic for a
//! given seed and call sequence.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use lumber_core::machine::DISCARD_ACTION;
use lumber_core::storage::{OPEN_STORAGE_ACTION, RemoteStorage, StorageFacility};
use lumber_core::world::{Camera, GameClock, Interact, Inventory, Navigator, Scene, StorageAccess};
use lumber_types::{
    AgentStatus, Area, DEFAULT_HARVEST_ACTION, Entity, EntityId, EntityKind, Item,
    PathCapabilities, Tile,
};
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::builder::{BOOTH_NAME, draw};
use crate::error::WorldError;
use crate::grid::{Grid, greedy_path};
use crate::inventory::Backpack;
use crate::trees::TreeNode;

/// Tunables of the simulated game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxSettings {
    /// Time to cross one tile.
    pub step_time: Duration,
    /// Time between logs while chopping.
    pub chop_interval: Duration,
    /// Stump time before a felled tree regrows.
    pub regrow_after: Duration,
    /// Fewest logs a tree yields before falling.
    pub min_logs: u32,
    /// Most logs a tree yields before falling.
    pub max_logs: u32,
    /// Farthest distance at which a click on an entity registers.
    pub reach: u32,
    /// Whether escalated paths may teleport straight to the goal.
    pub teleports: bool,
    /// Whether storage can be opened remotely.
    pub remote_storage: bool,
    /// Delay between an open-storage click landing and the interface showing.
    pub storage_delay: Duration,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            step_time: Duration::from_millis(600),
            chop_interval: Duration::from_millis(2400),
            regrow_after: Duration::from_secs(30),
            min_logs: 3,
            max_logs: 8,
            reach: 15,
            teleports: true,
            remote_storage: false,
            storage_delay: Duration::from_millis(600),
        }
    }
}

/// Counters of what the core asked the sandbox to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SandboxStats {
    /// Path builds requested.
    pub path_builds: u32,
    /// Escalated path builds requested.
    pub escalated_builds: u32,
    /// Single steps requested.
    pub steps: u32,
    /// Interaction requests received (accepted or not).
    pub interactions: u32,
    /// Camera turns (blocking or concurrent).
    pub camera_turns: u32,
    /// Logs added to the inventory by chopping.
    pub logs_chopped: u32,
    /// Items removed by dropping.
    pub items_dropped: u32,
    /// Items moved into storage.
    pub items_deposited: u32,
}

/// A path built by the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPath {
    tiles: VecDeque<Tile>,
    teleport: bool,
}

impl SandboxPath {
    /// Tiles still to walk.
    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    /// Whether this path jumps straight to its goal.
    pub const fn is_teleport(&self) -> bool {
        self.teleport
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Walker {
    pub(crate) position: Tile,
    pub(crate) moving_until: Duration,
}

#[derive(Debug, Clone, Copy)]
struct Chop {
    tree: EntityId,
    starts_at: Duration,
    next_log_at: Duration,
}

#[derive(Debug, Clone, Copy, Default)]
struct StorageState {
    open: bool,
    opens_at: Option<Duration>,
}

/// The simulated game world.
#[derive(Debug)]
pub struct Sandbox {
    settings: SandboxSettings,
    now: Duration,
    grid: Grid,
    agent: Option<Walker>,
    trees: Vec<TreeNode>,
    facilities: Vec<Entity>,
    backpack: Backpack,
    rng: StdRng,
    bank: BTreeMap<String, u32>,
    storage: StorageState,
    chop: Option<Chop>,
    stats: SandboxStats,
}

impl Sandbox {
    pub(crate) fn assemble(
        settings: SandboxSettings,
        grid: Grid,
        agent: Option<Walker>,
        trees: Vec<TreeNode>,
        facilities: Vec<Entity>,
        backpack: Backpack,
        rng: StdRng,
    ) -> Self {
        Self {
            settings,
            now: Duration::ZERO,
            grid,
            agent,
            trees,
            facilities,
            backpack,
            rng,
            bank: BTreeMap::new(),
            storage: StorageState::default(),
            chop: None,
            stats: SandboxStats::default(),
        }
    }

    /// Move the virtual clock forward by `duration`, resolving everything
    /// that happens in between.
    pub fn advance(&mut self, duration: Duration) {
        let until = self.now.saturating_add(duration);
        self.resolve_chopping(until);
        self.resolve_regrowth(until);
        if let Some(at) = self.storage.opens_at
            && at <= until
        {
            self.storage.opens_at = None;
            self.storage.open = true;
            trace!("Storage interface opened");
        }
        self.now = until;
    }

    /// Current virtual time.
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Counters of requests received so far.
    pub const fn stats(&self) -> SandboxStats {
        self.stats
    }

    /// Simulation tunables.
    pub const fn settings(&self) -> &SandboxSettings {
        &self.settings
    }

    /// The grid.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The agent's tile, if an agent is loaded.
    pub fn agent_position(&self) -> Option<Tile> {
        self.agent.map(|walker| walker.position)
    }

    /// The agent's inventory.
    pub const fn backpack(&self) -> &Backpack {
        &self.backpack
    }

    /// Items of `name` deposited so far.
    pub fn banked(&self, name: &str) -> u32 {
        self.bank.get(name).copied().unwrap_or(0)
    }

    /// Standing trees named `name`.
    pub fn standing_trees(&self, name: &str) -> usize {
        self.trees
            .iter()
            .filter_map(TreeNode::entity)
            .filter(|entity| entity.name == name)
            .count()
    }

    /// Fell the standing tree named `name` nearest to the agent, as if
    /// someone else had cut it. Returns whether one was felled.
    pub fn fell_nearest(&mut self, name: &str) -> bool {
        let from = self.agent_position().unwrap_or(Tile::new(0, 0));
        let regrow = self.settings.regrow_after;
        let now = self.now;
        let Some(tree) = self
            .trees
            .iter_mut()
            .filter(|tree| tree.entity().is_some_and(|e| e.name == name))
            .min_by_key(|tree| tree.tile().distance_to(from))
        else {
            return false;
        };
        while tree.chop(now, regrow) {}
        true
    }

    /// Place a bank booth while running.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] off the grid, or
    /// [`WorldError::TileOccupied`] if the tile is not free.
    pub fn add_booth(&mut self, tile: Tile) -> Result<(), WorldError> {
        self.grid.check(tile)?;
        if !self.is_traversable(tile) || self.agent_position() == Some(tile) {
            return Err(WorldError::TileOccupied {
                tile,
                occupant: "something".to_owned(),
            });
        }
        self.facilities.push(Entity {
            id: EntityId::new(),
            name: BOOTH_NAME.to_owned(),
            kind: EntityKind::Object,
            area: Area::single(tile),
            visibility: 100,
        });
        debug!(%tile, "Bank booth placed");
        Ok(())
    }

    fn draw_logs(&mut self) -> u32 {
        draw(&mut self.rng, self.settings.min_logs, self.settings.max_logs)
    }

    fn resolve_chopping(&mut self, until: Duration) {
        let regrow = self.settings.regrow_after;
        let interval = self.settings.chop_interval;

        while let Some(chop) = self.chop {
            if chop.next_log_at > until {
                break;
            }
            let Some(tree) = self
                .trees
                .iter_mut()
                .find(|tree| tree.entity().is_some_and(|e| e.id == chop.tree))
            else {
                self.chop = None;
                break;
            };
            if self.backpack.is_full() {
                self.chop = None;
                break;
            }
            if tree.chop(chop.next_log_at, regrow) && self.backpack.add(tree.log_name()) {
                self.stats.logs_chopped = self.stats.logs_chopped.saturating_add(1);
                trace!(tree = %tree.tile(), left = tree.logs_left(), "Log chopped");
            }
            self.chop = if tree.is_standing() && !self.backpack.is_full() {
                Some(Chop {
                    next_log_at: chop.next_log_at.saturating_add(interval),
                    ..chop
                })
            } else {
                debug!(tree = %tree.tile(), "Chopping stopped");
                None
            };
        }
    }

    fn resolve_regrowth(&mut self, until: Duration) {
        let due: Vec<usize> = self
            .trees
            .iter()
            .enumerate()
            .filter(|(_, tree)| tree.is_due(until))
            .map(|(index, _)| index)
            .collect();
        for index in due {
            let logs = self.draw_logs();
            if let Some(tree) = self.trees.get_mut(index)
                && tree.regrow_if_due(until, logs)
            {
                debug!(tree = %tree.tile(), logs, "Tree regrew");
            }
        }
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if let Some(tree) = self
            .trees
            .iter_mut()
            .find(|tree| tree.entity().is_some_and(|e| e.id == id))
        {
            return Some(tree.entity_mut());
        }
        self.facilities.iter_mut().find(|entity| entity.id == id)
    }

    fn is_facility(&self, entity: &Entity) -> bool {
        self.facilities.iter().any(|f| f.id == entity.id)
    }

    fn occupied(&self, tile: Tile) -> bool {
        self.trees.iter().any(|tree| tree.tile() == tile)
            || self.facilities.iter().any(|f| f.area.contains(tile))
    }

    /// Walk the agent next to `target` on its own and return when it
    /// arrives.
    fn walk_next_to(&mut self, target: &Entity) -> Duration {
        let Some(walker) = self.agent else {
            return self.now;
        };
        let distance = target.distance_from(walker.position);
        if distance <= 1 {
            return self.now;
        }
        let Some(spot) = target
            .area
            .surrounding_tiles()
            .into_iter()
            .filter(|tile| self.is_traversable(*tile))
            .min_by_key(|tile| tile.distance_to(walker.position))
        else {
            return self.now;
        };
        let walk = self
            .settings
            .step_time
            .saturating_mul(distance.saturating_sub(1));
        let arrival = self.now.saturating_add(walk);
        self.agent = Some(Walker {
            position: spot,
            moving_until: arrival,
        });
        arrival
    }

    fn count_request(&mut self) {
        self.stats.interactions = self.stats.interactions.saturating_add(1);
    }
}

impl GameClock for Sandbox {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

impl Scene for Sandbox {
    fn local_agent(&self) -> Option<AgentStatus> {
        self.agent.map(|walker| AgentStatus {
            position: walker.position,
            animating: self.chop.is_some_and(|chop| self.now >= chop.starts_at),
            moving: self.now < walker.moving_until,
        })
    }

    fn nearest_entity(&self, name: &str) -> Option<Entity> {
        let from = self.agent_position().unwrap_or(Tile::new(0, 0));
        self.trees
            .iter()
            .filter_map(TreeNode::entity)
            .chain(self.facilities.iter())
            .filter(|entity| entity.name == name)
            .min_by_key(|entity| entity.distance_from(from))
            .cloned()
    }

    fn is_valid(&self, entity: &Entity) -> bool {
        self.trees
            .iter()
            .filter_map(TreeNode::entity)
            .chain(self.facilities.iter())
            .any(|candidate| candidate.id == entity.id)
    }
}

impl Inventory for Sandbox {
    fn is_full(&self) -> bool {
        self.backpack.is_full()
    }

    fn contains(&self, name: &str) -> bool {
        self.backpack.count(name) > 0
    }

    fn count(&self, name: &str) -> u32 {
        self.backpack.count(name)
    }

    fn first_item(&self, name: &str) -> Option<Item> {
        self.backpack.first(name).cloned()
    }

    fn holds(&self, item: &Item) -> bool {
        self.backpack.holds(item.id)
    }
}

impl Interact<Entity> for Sandbox {
    fn interact(&mut self, target: &Entity, action: &str) -> bool {
        self.count_request();
        let Some(walker) = self.agent else {
            return false;
        };
        if !self.is_valid(target) {
            debug!(target_name = %target.name, "Click on a missing entity");
            return false;
        }
        if target.distance_from(walker.position) > self.settings.reach {
            debug!(target_name = %target.name, "Click out of reach");
            return false;
        }

        let facility = self.is_facility(target);
        if facility && action == OPEN_STORAGE_ACTION {
            let arrival = self.walk_next_to(target);
            self.chop = None;
            self.storage.opens_at = Some(arrival.saturating_add(self.settings.storage_delay));
            return true;
        }
        if !facility && action == DEFAULT_HARVEST_ACTION {
            let arrival = self.walk_next_to(target);
            self.chop = Some(Chop {
                tree: target.id,
                starts_at: arrival,
                next_log_at: arrival.saturating_add(self.settings.chop_interval),
            });
            return true;
        }
        debug!(target_name = %target.name, action, "Unsupported action");
        false
    }
}

impl Interact<Item> for Sandbox {
    fn interact(&mut self, target: &Item, action: &str) -> bool {
        self.count_request();
        if action != DISCARD_ACTION || !self.backpack.remove(target.id) {
            return false;
        }
        self.stats.items_dropped = self.stats.items_dropped.saturating_add(1);
        true
    }
}

impl Interact<RemoteStorage> for Sandbox {
    fn interact(&mut self, _target: &RemoteStorage, action: &str) -> bool {
        self.count_request();
        if !self.settings.remote_storage || action != OPEN_STORAGE_ACTION {
            return false;
        }
        self.chop = None;
        self.storage.opens_at = Some(self.now.saturating_add(self.settings.storage_delay));
        true
    }
}

impl Navigator for Sandbox {
    type Path = SandboxPath;

    fn is_traversable(&self, tile: Tile) -> bool {
        self.grid.in_bounds(tile) && !self.grid.is_obstacle(tile) && !self.occupied(tile)
    }

    fn build_path(
        &mut self,
        from: Tile,
        goals: &[Tile],
        capabilities: PathCapabilities,
    ) -> Option<Self::Path> {
        self.stats.path_builds = self.stats.path_builds.saturating_add(1);
        if capabilities.teleports {
            self.stats.escalated_builds = self.stats.escalated_builds.saturating_add(1);
        }

        let goal = goals
            .iter()
            .copied()
            .filter(|tile| self.grid.in_bounds(*tile))
            .min_by_key(|tile| tile.distance_to(from))?;

        if capabilities.teleports && self.settings.teleports && self.is_traversable(goal) {
            return Some(SandboxPath {
                tiles: VecDeque::from([goal]),
                teleport: true,
            });
        }
        let tiles = greedy_path(from, goal, |tile| self.is_traversable(tile));
        Some(SandboxPath {
            tiles: tiles.into(),
            teleport: false,
        })
    }

    fn step(&mut self, path: &mut Self::Path) -> bool {
        self.stats.steps = self.stats.steps.saturating_add(1);
        let Some(walker) = self.agent else {
            return false;
        };
        let Some(next) = path.tiles.front().copied() else {
            return false;
        };
        if !self.is_traversable(next) {
            trace!(tile = %next, "Step blocked");
            return false;
        }
        if !path.teleport && walker.position.distance_to(next) > 1 {
            return false;
        }
        path.tiles.pop_front();
        self.agent = Some(Walker {
            position: next,
            moving_until: self.now.saturating_add(self.settings.step_time),
        });
        self.chop = None;
        self.storage = StorageState::default();
        true
    }
}

impl Camera for Sandbox {
    fn turn_to_concurrently(&mut self, entity: &Entity) {
        self.turn_to(entity);
    }

    fn turn_to(&mut self, entity: &Entity) -> bool {
        self.stats.camera_turns = self.stats.camera_turns.saturating_add(1);
        match self.entity_mut(entity.id) {
            Some(target) => {
                target.visibility = 100;
                true
            }
            None => false,
        }
    }
}

impl StorageAccess for Sandbox {
    fn nearest_storage(&self) -> Option<StorageFacility> {
        let from = self.agent_position().unwrap_or(Tile::new(0, 0));
        self.facilities
            .iter()
            .min_by_key(|entity| entity.distance_from(from))
            .cloned()
            .map(StorageFacility::from_entity)
    }

    fn is_storage_open(&self) -> bool {
        self.storage.open
    }

    fn deposit_inventory(&mut self) -> bool {
        if !self.storage.open {
            return false;
        }
        for item in self.backpack.take_all() {
            let banked = self.bank.entry(item.name).or_insert(0);
            *banked = banked.saturating_add(1);
            self.stats.items_deposited = self.stats.items_deposited.saturating_add(1);
        }
        true
    }

    fn close_storage(&mut self) -> bool {
        let was_open = self.storage.open;
        self.storage = StorageState::default();
        was_open
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lumber_types::TreeType;

    use super::*;
    use crate::builder::SandboxBuilder;

    fn fixed_logs(logs: u32) -> SandboxSettings {
        SandboxSettings {
            min_logs: logs,
            max_logs: logs,
            ..SandboxSettings::default()
        }
    }

    fn agent(sandbox: &Sandbox) -> AgentStatus {
        sandbox.local_agent().unwrap()
    }

    #[test]
    fn chopping_yields_logs_until_the_tree_falls() {
        let mut sandbox = SandboxBuilder::new(20, 20)
            .settings(fixed_logs(3))
            .agent_at(Tile::new(5, 5))
            .tree(TreeType::Normal, Tile::new(6, 5))
            .build()
            .unwrap();
        let tree = sandbox.nearest_entity("Tree").unwrap();

        assert!(sandbox.interact(&tree, DEFAULT_HARVEST_ACTION));
        assert!(agent(&sandbox).animating);

        sandbox.advance(Duration::from_millis(2400));
        assert_eq!(sandbox.count("Logs"), 1);

        sandbox.advance(Duration::from_millis(4800));
        assert_eq!(sandbox.count("Logs"), 3);
        assert!(!agent(&sandbox).animating);
        assert_eq!(sandbox.standing_trees("Tree"), 0);
        assert!(!sandbox.is_valid(&tree));

        sandbox.advance(Duration::from_secs(30));
        assert_eq!(sandbox.standing_trees("Tree"), 1);
    }

    #[test]
    fn chopping_stops_when_inventory_fills() {
        let mut sandbox = SandboxBuilder::new(20, 20)
            .settings(fixed_logs(10))
            .capacity(2)
            .agent_at(Tile::new(5, 5))
            .tree(TreeType::Oak, Tile::new(6, 5))
            .build()
            .unwrap();
        let tree = sandbox.nearest_entity("Oak tree").unwrap();

        sandbox.interact(&tree, DEFAULT_HARVEST_ACTION);
        sandbox.advance(Duration::from_secs(60));

        assert!(sandbox.is_full());
        assert!(!agent(&sandbox).animating);
        assert_eq!(sandbox.stats().logs_chopped, 2);
    }

    #[test]
    fn distant_click_walks_before_animating() {
        let mut sandbox = SandboxBuilder::new(20, 20)
            .agent_at(Tile::new(5, 5))
            .tree(TreeType::Normal, Tile::new(10, 5))
            .build()
            .unwrap();
        let tree = sandbox.nearest_entity("Tree").unwrap();

        assert!(sandbox.interact(&tree, DEFAULT_HARVEST_ACTION));
        let status = agent(&sandbox);
        assert!(status.moving);
        assert!(!status.animating);
        assert_eq!(tree.distance_from(status.position), 1);

        sandbox.advance(Duration::from_millis(2400));
        let status = agent(&sandbox);
        assert!(!status.moving);
        assert!(status.animating);
    }

    #[test]
    fn wrong_action_and_out_of_reach_are_rejected() {
        let mut sandbox = SandboxBuilder::new(40, 40)
            .agent_at(Tile::new(0, 0))
            .tree(TreeType::Normal, Tile::new(1, 1))
            .tree(TreeType::Oak, Tile::new(30, 30))
            .build()
            .unwrap();
        let near = sandbox.nearest_entity("Tree").unwrap();
        let far = sandbox.nearest_entity("Oak tree").unwrap();

        assert!(!sandbox.interact(&near, "Bank"));
        assert!(!sandbox.interact(&far, DEFAULT_HARVEST_ACTION));
        assert_eq!(sandbox.stats().interactions, 2);
    }

    #[test]
    fn steps_stop_at_walls() {
        let mut sandbox = SandboxBuilder::new(20, 20)
            .agent_at(Tile::new(5, 5))
            .wall(Tile::new(7, 0), Tile::new(7, 19))
            .build()
            .unwrap();
        let mut path = sandbox
            .build_path(Tile::new(5, 5), &[Tile::new(9, 5)], PathCapabilities::WALK)
            .unwrap();

        assert!(sandbox.step(&mut path));
        assert!(agent(&sandbox).moving);
        assert!(!sandbox.step(&mut path));
        assert!(!sandbox.step(&mut path));
        assert_eq!(sandbox.agent_position(), Some(Tile::new(6, 5)));
    }

    #[test]
    fn escalated_path_jumps_the_wall() {
        let mut sandbox = SandboxBuilder::new(20, 20)
            .agent_at(Tile::new(5, 5))
            .wall(Tile::new(7, 0), Tile::new(7, 19))
            .build()
            .unwrap();
        let mut path = sandbox
            .build_path(Tile::new(5, 5), &[Tile::new(9, 5)], PathCapabilities::ESCALATED)
            .unwrap();

        assert!(path.is_teleport());
        assert!(sandbox.step(&mut path));
        assert_eq!(sandbox.agent_position(), Some(Tile::new(9, 5)));
        assert_eq!(sandbox.stats().escalated_builds, 1);
    }

    #[test]
    fn storage_opens_after_a_delay_and_takes_everything() {
        let mut sandbox = SandboxBuilder::new(20, 20)
            .agent_at(Tile::new(5, 5))
            .booth(Tile::new(6, 5))
            .give("Oak logs", 4)
            .give("Bronze axe", 1)
            .build()
            .unwrap();
        let facility = sandbox.nearest_storage().unwrap();
        let booth = lumber_core::storage::OpensStorage::entity(&facility).clone();

        assert!(sandbox.interact(&booth, OPEN_STORAGE_ACTION));
        assert!(!sandbox.is_storage_open());
        assert!(!sandbox.deposit_inventory());

        sandbox.advance(Duration::from_millis(600));
        assert!(sandbox.is_storage_open());
        assert!(sandbox.deposit_inventory());
        assert!(sandbox.close_storage());

        assert_eq!(sandbox.banked("Oak logs"), 4);
        assert_eq!(sandbox.banked("Bronze axe"), 1);
        assert!(sandbox.backpack().is_empty());
        assert!(!sandbox.is_storage_open());
    }

    #[test]
    fn remote_storage_needs_the_setting() {
        let mut closed = SandboxBuilder::new(5, 5).build().unwrap();
        assert!(!closed.interact(&RemoteStorage, OPEN_STORAGE_ACTION));

        let settings = SandboxSettings {
            remote_storage: true,
            ..SandboxSettings::default()
        };
        let mut open = SandboxBuilder::new(5, 5).settings(settings).build().unwrap();
        assert!(open.interact(&RemoteStorage, OPEN_STORAGE_ACTION));
        open.advance(Duration::from_millis(600));
        assert!(open.is_storage_open());
    }

    #[test]
    fn dropping_removes_the_item() {
        let mut sandbox = SandboxBuilder::new(5, 5).give("Logs", 2).build().unwrap();
        let item = sandbox.first_item("Logs").unwrap();

        assert!(sandbox.interact(&item, DISCARD_ACTION));
        assert!(!sandbox.holds(&item));
        assert!(!sandbox.interact(&item, DISCARD_ACTION));
        assert_eq!(sandbox.count("Logs"), 1);
    }

    #[test]
    fn camera_turn_brings_entity_into_view() {
        let mut sandbox = SandboxBuilder::new(10, 10)
            .visibility(20)
            .tree(TreeType::Normal, Tile::new(4, 4))
            .build()
            .unwrap();
        let tree = sandbox.nearest_entity("Tree").unwrap();
        assert_eq!(tree.visibility, 20);

        sandbox.turn_to_concurrently(&tree);

        assert_eq!(sandbox.nearest_entity("Tree").unwrap().visibility, 100);
        assert_eq!(sandbox.stats().camera_turns, 1);
    }
}
