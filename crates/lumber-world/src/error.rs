//! Error types for the `lumber-world` crate.
//!
//! Only sandbox construction is fallible. Once built, the sandbox answers
//! every collaborator call with a plain value.

use lumber_types::Tile;

/// Errors raised while laying out a sandbox.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A tile lies outside the grid.
    #[error("tile {tile} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The offending tile.
        tile: Tile,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// Two things were placed on the same tile.
    #[error("tile {tile} is already occupied by {occupant}")]
    TileOccupied {
        /// The contested tile.
        tile: Tile,
        /// What is already there.
        occupant: String,
    },

    /// More items were given than the inventory holds.
    #[error("inventory holds at most {capacity} items")]
    InventoryFull {
        /// Slot count.
        capacity: u8,
    },

    /// The layout is unusable for another reason.
    #[error("invalid layout: {reason}")]
    InvalidLayout {
        /// Human-readable explanation.
        reason: String,
    },
}
