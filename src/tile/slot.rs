//! Per-tile resource lifecycle.
//!
//! A [`TileSlot`] owns at most one [`ResourceHandle`] and at most one
//! outstanding fetch. Every fetch is tagged with a generation drawn from one
//! process-wide counter; changing media or tearing the tile down moves the
//! slot to a fresh generation, so a late result is recognised and dropped
//! instead of displayed. A slot recreated for the same item never reuses a
//! ticket issued to its predecessor.

use super::handle::{HandleStore, ResourceHandle};
use crate::layout::DEFAULT_ASPECT_RATIO;
use crate::model::{ItemId, MediaId, MediaRef, Resolution, TransportError};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Generation 0 is never issued; a fresh slot holds it until its first fetch.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// A resource fetch the host must perform for one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTicket {
    tile: ItemId,
    generation: u64,
    media: MediaId,
    resolution: Resolution,
}

impl ResourceTicket {
    /// Tile (keyed by the item it displays) that asked.
    pub fn tile(&self) -> &ItemId {
        &self.tile
    }

    /// Media the fetch is for.
    pub fn media(&self) -> &MediaId {
        &self.media
    }

    /// Variant to request; already resolved against what the media serves.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Unique tag of the fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What [`TileSlot::complete`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Payload wrapped in a handle and now displayed.
    Displayed,
    /// Fetch failed; the tile shows its placeholder.
    Failed,
    /// Result belongs to superseded media or a torn-down tile; dropped.
    Stale,
}

/// Display state of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    /// Fetch outstanding.
    Loading,
    /// Handle available.
    Ready,
    /// No media, or the fetch failed.
    NoImage,
    /// Removed from view; accepts nothing further.
    TornDown,
}

/// Resource owner for one tile.
#[derive(Debug)]
pub struct TileSlot {
    key: ItemId,
    generation: u64,
    media: Option<MediaId>,
    aspect_ratio: f64,
    handle: Option<ResourceHandle>,
    state: TileState,
}

impl TileSlot {
    /// Create a slot for the tile of item `key`. Nothing is shown yet.
    pub fn new(key: ItemId) -> Self {
        Self {
            key,
            generation: 0,
            media: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            handle: None,
            state: TileState::NoImage,
        }
    }

    /// Item the tile displays.
    pub fn key(&self) -> &ItemId {
        &self.key
    }

    /// Current display state.
    pub fn state(&self) -> TileState {
        self.state
    }

    /// URL of the displayed resource, when ready.
    pub fn url(&self) -> Option<&str> {
        self.handle.as_ref().map(ResourceHandle::url)
    }

    /// Media currently assigned to the tile.
    pub fn media(&self) -> Option<&MediaId> {
        self.media.as_ref()
    }

    /// Aspect ratio used to reserve space; the 2:3 default until known.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Point the tile at `media` (or at nothing).
    ///
    /// Showing the media already assigned is a no-op. Otherwise the current
    /// handle is released first, any outstanding fetch is abandoned, and a
    /// ticket for the new media is returned.
    pub fn show<S: HandleStore>(
        &mut self,
        media: Option<&MediaRef>,
        preferred: Resolution,
        store: &mut S,
    ) -> Option<ResourceTicket> {
        if self.state == TileState::TornDown {
            debug!(tile = %self.key, "Ignoring show on torn-down tile");
            return None;
        }

        let next = media.map(|m| &m.id);
        if next == self.media.as_ref() && self.state != TileState::NoImage {
            return None;
        }

        self.release_current(store);
        self.generation = next_generation();
        self.media = next.cloned();
        self.aspect_ratio = media
            .and_then(MediaRef::aspect_ratio)
            .unwrap_or(DEFAULT_ASPECT_RATIO);

        let Some(media) = media else {
            self.state = TileState::NoImage;
            return None;
        };

        self.state = TileState::Loading;
        Some(ResourceTicket {
            tile: self.key.clone(),
            generation: self.generation,
            media: media.id.clone(),
            resolution: media.variant_for(preferred),
        })
    }

    /// Settle a fetch issued by [`show`](Self::show).
    pub fn complete<S: HandleStore>(
        &mut self,
        ticket: &ResourceTicket,
        result: Result<Vec<u8>, TransportError>,
        store: &mut S,
    ) -> ResourceOutcome {
        let current = self.state == TileState::Loading
            && ticket.tile == self.key
            && ticket.generation == self.generation
            && self.media.as_ref() == Some(&ticket.media);
        if !current {
            debug!(
                tile = %self.key,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "Discarding stale resource result"
            );
            return ResourceOutcome::Stale;
        }

        match result {
            Ok(payload) => {
                self.handle = Some(store.acquire(&ticket.media, payload));
                self.state = TileState::Ready;
                ResourceOutcome::Displayed
            }
            Err(err) => {
                warn!(tile = %self.key, media = %ticket.media, error = %err, "Resource fetch failed");
                self.state = TileState::NoImage;
                ResourceOutcome::Failed
            }
        }
    }

    /// Remove the tile from view, releasing its handle synchronously.
    pub fn teardown<S: HandleStore>(&mut self, store: &mut S) {
        self.release_current(store);
        self.generation = next_generation();
        self.state = TileState::TornDown;
    }

    fn release_current<S: HandleStore>(&mut self, store: &mut S) {
        if let Some(handle) = self.handle.take() {
            store.release(handle);
        }
    }
}

impl Drop for TileSlot {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            warn!(tile = %self.key, url = handle.url(), "Tile dropped without teardown");
        }
    }
}
