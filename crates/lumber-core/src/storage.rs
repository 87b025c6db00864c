//! Storage facilities: anything that can be approached and opened to
//! deposit items.
//!
//! Bank booths (fixed objects) and bankers (NPCs) differ only in how they
//! are reached and which label opens them, so both implement the single
//! [`OpensStorage`] capability and the core never branches on the concrete
//! kind.

use lumber_types::{Destination, Entity, EntityKind};

/// Interaction label that opens storage at a booth or banker.
pub const OPEN_STORAGE_ACTION: &str = "Bank";

/// The "can be approached and opened for storage" capability.
pub trait OpensStorage {
    /// The scene entity that is interacted with.
    fn entity(&self) -> &Entity;

    /// Interaction label that opens the storage interface.
    fn open_action(&self) -> &'static str;

    /// Where the agent should walk to before interacting.
    fn destination(&self) -> Destination;
}

/// A fixed bank booth. Its footprint is never walkable, so the agent aims
/// for the ring of tiles around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankBooth(pub Entity);

impl OpensStorage for BankBooth {
    fn entity(&self) -> &Entity {
        &self.0
    }

    fn open_action(&self) -> &'static str {
        OPEN_STORAGE_ACTION
    }

    fn destination(&self) -> Destination {
        Destination::AnyOf(self.0.area.surrounding_tiles())
    }
}

/// A banker NPC. NPCs wander, so the agent aims at the NPC's current
/// footprint and lets navigation substitute neighbours if needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banker(pub Entity);

impl OpensStorage for Banker {
    fn entity(&self) -> &Entity {
        &self.0
    }

    fn open_action(&self) -> &'static str {
        OPEN_STORAGE_ACTION
    }

    fn destination(&self) -> Destination {
        self.0.destination()
    }
}

/// Any storage facility found in the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageFacility {
    /// A fixed booth.
    Booth(BankBooth),
    /// An NPC banker.
    Banker(Banker),
}

impl StorageFacility {
    /// Wrap an entity in the facility variant matching its kind.
    pub fn from_entity(entity: Entity) -> Self {
        match entity.kind {
            EntityKind::Object => Self::Booth(BankBooth(entity)),
            EntityKind::Npc => Self::Banker(Banker(entity)),
        }
    }

    fn inner(&self) -> &dyn OpensStorage {
        match self {
            Self::Booth(booth) => booth,
            Self::Banker(banker) => banker,
        }
    }
}

impl OpensStorage for StorageFacility {
    fn entity(&self) -> &Entity {
        self.inner().entity()
    }

    fn open_action(&self) -> &'static str {
        self.inner().open_action()
    }

    fn destination(&self) -> Destination {
        self.inner().destination()
    }
}

/// Storage that is reachable without walking (a remote or teleport-side
/// bank). Used as the interaction target of the last-resort fallback when
/// navigation to every nearby facility is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteStorage;
