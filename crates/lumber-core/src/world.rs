//! Collaborator contracts between the decision core and the game client.
//!
//! The core never talks to a client directly. Everything it needs (scene
//! queries, inventory queries, the agent's own status, path building,
//! camera control, storage primitives, and a monotonic clock) is expressed
//! as a trait here. A live client adapter and the sandbox world both
//! implement the full set, which is bundled as [`GameWorld`].

use std::time::Duration;

use lumber_types::{AgentStatus, Entity, Item, PathCapabilities, Tile};

use crate::storage::{RemoteStorage, StorageFacility};

/// A monotonic game clock the core can suspend on.
///
/// `sleep` is cooperative: in a live client it blocks the bot thread, in
/// the sandbox it advances simulated time.
pub trait GameClock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Suspend the current cycle for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Queries against the loaded scene.
pub trait Scene {
    /// The local agent, or `None` while the client has no player loaded.
    fn local_agent(&self) -> Option<AgentStatus>;

    /// The nearest scene entity whose name is exactly `name`.
    fn nearest_entity(&self, name: &str) -> Option<Entity>;

    /// Whether `entity` still exists in the scene.
    fn is_valid(&self, entity: &Entity) -> bool;
}

/// Queries against the agent's inventory.
pub trait Inventory {
    /// Whether every inventory slot is occupied.
    fn is_full(&self) -> bool;

    /// Whether any stack named `name` is held.
    fn contains(&self, name: &str) -> bool;

    /// Number of stacks named `name`.
    fn count(&self, name: &str) -> u32;

    /// The first stack named `name`, in slot order.
    fn first_item(&self, name: &str) -> Option<Item>;

    /// Whether `item` is still held.
    fn holds(&self, item: &Item) -> bool;
}

/// Something the agent can issue a labelled interaction against.
///
/// The return value only says whether the request was accepted; it is
/// never proof that the interaction had its effect.
pub trait Interact<T: ?Sized> {
    /// Attempt the `action` interaction on `target`.
    fn interact(&mut self, target: &T, action: &str) -> bool;
}

/// Path building and single-step movement.
pub trait Navigator {
    /// A built path. Owned by the navigation episode that built it.
    type Path;

    /// Whether the agent can stand on `tile`.
    fn is_traversable(&self, tile: Tile) -> bool;

    /// Build a path from `from` to any of `goals`.
    fn build_path(
        &mut self,
        from: Tile,
        goals: &[Tile],
        capabilities: PathCapabilities,
    ) -> Option<Self::Path>;

    /// Take the next step of `path`. Returns whether a step was issued.
    fn step(&mut self, path: &mut Self::Path) -> bool;
}

/// Camera control.
pub trait Camera {
    /// Start turning towards `entity` in the background and return at once.
    fn turn_to_concurrently(&mut self, entity: &Entity);

    /// Turn towards `entity` and return once the turn is issued.
    fn turn_to(&mut self, entity: &Entity) -> bool;
}

/// Storage facility discovery and the open-storage interface.
pub trait StorageAccess {
    /// The nearest facility that can be opened for storage.
    fn nearest_storage(&self) -> Option<StorageFacility>;

    /// Whether the storage interface is open.
    fn is_storage_open(&self) -> bool;

    /// Deposit the whole inventory into open storage.
    fn deposit_inventory(&mut self) -> bool;

    /// Close the storage interface.
    fn close_storage(&mut self) -> bool;
}

/// The full set of capabilities the decision core runs against.
pub trait GameWorld:
    GameClock
    + Scene
    + Inventory
    + Navigator
    + Camera
    + StorageAccess
    + Interact<Entity>
    + Interact<Item>
    + Interact<RemoteStorage>
{
}

impl<T> GameWorld for T where
    T: GameClock
        + Scene
        + Inventory
        + Navigator
        + Camera
        + StorageAccess
        + Interact<Entity>
        + Interact<Item>
        + Interact<RemoteStorage>
{
}
