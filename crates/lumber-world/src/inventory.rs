//! A fixed-size slot inventory.

use lumber_types::{Item, ItemId};

/// Slot count of a standard inventory.
pub const DEFAULT_CAPACITY: u8 = 28;

/// Items held by the agent, at most one per slot.
#[derive(Debug, Clone)]
pub struct Backpack {
    capacity: u8,
    items: Vec<Item>,
}

impl Backpack {
    /// An empty backpack with `capacity` slots.
    pub const fn new(capacity: u8) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    /// Slot count.
    pub const fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.items.len() >= usize::from(self.capacity)
    }

    /// Put `name` into the lowest free slot. Returns `false` when full.
    pub fn add(&mut self, name: &str) -> bool {
        let Some(slot) = (0..self.capacity).find(|slot| self.items.iter().all(|i| i.slot != *slot))
        else {
            return false;
        };
        self.items.push(Item {
            id: ItemId::new(),
            name: name.to_owned(),
            slot,
        });
        true
    }

    /// Remove the item with `id`. Returns whether it was held.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Whether the item with `id` is held.
    pub fn holds(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Number of items named `name`.
    pub fn count(&self, name: &str) -> u32 {
        let held = self.items.iter().filter(|item| item.name == name).count();
        u32::try_from(held).unwrap_or(u32::MAX)
    }

    /// The item named `name` in the lowest slot.
    pub fn first(&self, name: &str) -> Option<&Item> {
        self.items
            .iter()
            .filter(|item| item.name == name)
            .min_by_key(|item| item.slot)
    }

    /// Empty every slot, returning what was held.
    pub fn take_all(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }
}

impl Default for Backpack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
