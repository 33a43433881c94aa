//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod feed_item;
pub mod filter;
pub mod identifiers;

// Re-export for convenience
pub use error::{AppError, TransportError};
pub use feed_item::{CaptureSettings, FeedItem, MediaRef, Resolution};
pub use filter::{DateRange, FilterSpec, GeoRadius, NumericRange, PageQuery, PageWindow};
pub use identifiers::{InvalidItemId, InvalidMediaId, ItemId, MediaId};
