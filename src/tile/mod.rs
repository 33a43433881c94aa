//! Tile resource loading: per-tile fetch tickets and scoped handles.

pub mod handle;
pub mod loader;
pub mod slot;

pub use handle::{HandleStore, LocalHandleStore, ResourceHandle};
pub use loader::TileResourceLoader;
pub use slot::{ResourceOutcome, ResourceTicket, TileSlot, TileState};
