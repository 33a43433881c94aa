//! Gallery Feed
//!
//! Paginated photo feed loading with a column-balanced tile layout.
//!
//! The library follows a Pure Core / Impure Shell split: the feed controller,
//! scroll sentinel, layout and tile loader never perform I/O. They hand out
//! tickets describing the fetch they need, and the host (or
//! [`gallery::GallerySession::drive`]) performs it against a
//! [`source::PageProvider`] / [`source::ResourceProvider`] and hands the
//! result back.

pub mod config;
pub mod feed;
pub mod gallery;
pub mod layout;
pub mod logging;
pub mod model;
pub mod source;
pub mod tile;
