//! Providers the feed consumes.
//!
//! The core never calls these traits itself; it issues tickets and the shell
//! (see [`crate::gallery::GallerySession::drive`]) fulfils them here.
//!
//! This module also ships two local providers used by the binary and tests:
//! - [`JsonlCatalog`] serves pages from a JSONL file of feed items
//! - [`DirectoryResources`] serves binary resources from a directory tree

use crate::model::{FeedItem, FilterSpec, MediaId, PageWindow, Resolution, TransportError};
use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod resources;

pub use catalog::JsonlCatalog;
pub use resources::DirectoryResources;

/// Paged list provider.
///
/// Must return at most `window.take` items, in a stable order for a given
/// filter. A page shorter than `window.take` is the only end-of-data signal.
pub trait PageProvider {
    /// Fetch the items of `filter` that fall in `window`.
    fn fetch_page(
        &mut self,
        filter: &FilterSpec,
        window: PageWindow,
    ) -> Result<Vec<FeedItem>, TransportError>;
}

/// Binary resource provider.
pub trait ResourceProvider {
    /// Fetch the payload of `media` at `resolution`.
    fn fetch_resource(
        &mut self,
        media: &MediaId,
        resolution: Resolution,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Errors loading a local catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// A line is not a valid feed item.
    ///
    /// Non-fatal while loading: the line is skipped and reported.
    #[error("Invalid item at line {line}: {message}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Two lines carry the same item id.
    #[error("Duplicate item id '{id}' at line {line}")]
    DuplicateId {
        /// 1-based line number of the repeat.
        line: usize,
        /// The repeated id.
        id: String,
    },

    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
