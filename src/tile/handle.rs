//! Scoped handles for fetched tile resources.
//!
//! A [`ResourceHandle`] is the locally addressable form of a fetched payload
//! (a `blob:` URL the view can display). Handles are not `Clone`: releasing
//! one consumes it, so a handle cannot be released twice.

use crate::model::MediaId;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Owned reference to a payload held by a [`HandleStore`].
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    id: u64,
    url: String,
}

impl ResourceHandle {
    /// Local URL to display.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Store-local identity.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Mints and releases resource handles.
pub trait HandleStore {
    /// Wrap `payload` in a new handle.
    fn acquire(&mut self, media: &MediaId, payload: Vec<u8>) -> ResourceHandle;

    /// Release a handle, dropping its payload.
    fn release(&mut self, handle: ResourceHandle);
}

/// In-memory handle store with acquire/release accounting.
#[derive(Debug, Default)]
pub struct LocalHandleStore {
    next_id: u64,
    live: HashMap<u64, Vec<u8>>,
    acquired: usize,
    released: usize,
}

impl LocalHandleStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload behind a live handle.
    pub fn payload(&self, handle: &ResourceHandle) -> Option<&[u8]> {
        self.live.get(&handle.id).map(Vec::as_slice)
    }

    /// Handles acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Handles acquired so far.
    pub fn acquired(&self) -> usize {
        self.acquired
    }

    /// Handles released so far.
    pub fn released(&self) -> usize {
        self.released
    }
}

impl HandleStore for LocalHandleStore {
    fn acquire(&mut self, media: &MediaId, payload: Vec<u8>) -> ResourceHandle {
        self.next_id += 1;
        let id = self.next_id;
        let url = format!("blob:gallery/{media}/{id}");
        trace!(%url, bytes = payload.len(), "Handle acquired");
        self.live.insert(id, payload);
        self.acquired += 1;
        ResourceHandle { id, url }
    }

    fn release(&mut self, handle: ResourceHandle) {
        trace!(url = %handle.url, "Handle released");
        if self.live.remove(&handle.id).is_some() {
            self.released += 1;
        }
    }
}
