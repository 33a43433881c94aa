//! Resource loading for every mounted tile of a gallery view.
//!
//! Tiles are keyed by the item they display. Mounting creates (or reuses) a
//! [`TileSlot`]; unmounting tears it down. Failures stay local to the tile
//! and never reach the feed controller.

use super::handle::HandleStore;
use super::slot::{ResourceOutcome, ResourceTicket, TileSlot};
use crate::model::{FeedItem, ItemId, Resolution, TransportError};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Owner of all tile slots and the handle store they share.
#[derive(Debug)]
pub struct TileResourceLoader<S: HandleStore> {
    store: S,
    resolution: Resolution,
    tiles: HashMap<ItemId, TileSlot>,
}

impl<S: HandleStore> TileResourceLoader<S> {
    /// Loader requesting `resolution` (falling back per media when not served).
    pub fn new(store: S, resolution: Resolution) -> Self {
        Self {
            store,
            resolution,
            tiles: HashMap::new(),
        }
    }

    /// Resolution tiles ask for.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Mount the tile for `item`, or re-point an existing one at its
    /// current primary media.
    pub fn mount(&mut self, item: &FeedItem) -> Option<ResourceTicket> {
        let slot = self
            .tiles
            .entry(item.id.clone())
            .or_insert_with(|| TileSlot::new(item.id.clone()));
        slot.show(item.primary_media(), self.resolution, &mut self.store)
    }

    /// Tear down and forget the tile for `id`.
    pub fn unmount(&mut self, id: &ItemId) {
        if let Some(mut slot) = self.tiles.remove(id) {
            slot.teardown(&mut self.store);
        }
    }

    /// Bring the mounted set in line with `items`: new items are mounted,
    /// tiles whose media changed are re-pointed, tiles for items no longer
    /// present are torn down. A tile showing a failed placeholder for the
    /// same media is left alone.
    pub fn sync(&mut self, items: &[FeedItem]) -> Vec<ResourceTicket> {
        let present: HashSet<&ItemId> = items.iter().map(|item| &item.id).collect();
        let gone: Vec<ItemId> = self
            .tiles
            .keys()
            .filter(|id| !present.contains(id))
            .cloned()
            .collect();
        for id in &gone {
            self.unmount(id);
        }
        if !gone.is_empty() {
            debug!(unmounted = gone.len(), "Tiles removed from view");
        }

        let mut tickets = Vec::new();
        for item in items {
            if self.needs_mount(item) {
                tickets.extend(self.mount(item));
            }
        }
        tickets
    }

    fn needs_mount(&self, item: &FeedItem) -> bool {
        match self.tiles.get(&item.id) {
            None => true,
            Some(slot) => slot.media() != item.primary_media().map(|m| &m.id),
        }
    }

    /// Route a fetch result to the tile that asked for it.
    pub fn complete(
        &mut self,
        ticket: &ResourceTicket,
        result: Result<Vec<u8>, TransportError>,
    ) -> ResourceOutcome {
        match self.tiles.get_mut(ticket.tile()) {
            Some(slot) => slot.complete(ticket, result, &mut self.store),
            None => {
                debug!(tile = %ticket.tile(), "Result for unmounted tile dropped");
                ResourceOutcome::Stale
            }
        }
    }

    /// Tear down every tile.
    pub fn teardown_all(&mut self) {
        for (_, mut slot) in self.tiles.drain() {
            slot.teardown(&mut self.store);
        }
    }

    /// Tile for `id`, when mounted.
    pub fn tile(&self, id: &ItemId) -> Option<&TileSlot> {
        self.tiles.get(id)
    }

    /// Number of mounted tiles.
    pub fn mounted(&self) -> usize {
        self.tiles.len()
    }

    /// Handle store shared by every tile.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: HandleStore> Drop for TileResourceLoader<S> {
    fn drop(&mut self) {
        self.teardown_all();
    }
}
