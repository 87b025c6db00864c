//! Type-safe identifier wrappers around [`Uuid`].
//!
//! World entities and inventory items each get a distinct ID type so that
//! an item can never be handed to something expecting a scene entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a time-ordered [`Uuid`] newtype.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new identifier using UUID v7.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id! {
    /// Identity of an entity in the scene (tree, bank booth, banker).
    EntityId
}

define_id! {
    /// Identity of an item stack held in the inventory.
    ItemId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_unique() {
        let first = EntityId::new();
        assert_ne!(first, EntityId::new());
        assert_eq!(first, first);
        assert_ne!(ItemId::default(), ItemId::default());
    }
}
