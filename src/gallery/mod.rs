//! Gallery session: the surface an embedding view talks to.
//!
//! Inbound calls (filter change, resize, anchor visibility, retry, item
//! activation) update the feed, the layout and the tiles, and return the
//! [`Effect`]s the host must carry out. Results come back through
//! [`GallerySession::complete_page`] and [`GallerySession::complete_resource`].
//! [`GallerySession::drive`] runs effects synchronously against provider
//! implementations.

use crate::config::ResolvedConfig;
use crate::feed::{
    AnchorId, Bounds, FeedController, FeedSnapshot, Intersection, PageOutcome, PageSize,
    PageTicket, ScrollSentinel, SentinelConfig, SentinelGate, Viewport,
};
use crate::layout::{layout_columns, ColumnAssignment, ColumnBreakpoints, ColumnCount};
use crate::model::{FeedItem, FilterSpec, ItemId, Resolution, TransportError};
use crate::source::{PageProvider, ResourceProvider};
use crate::tile::{HandleStore, ResourceOutcome, ResourceTicket, TileResourceLoader, TileSlot};
use std::collections::VecDeque;
use tracing::{debug, info};

pub mod text;

/// Work the host must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch a page and hand it to [`GallerySession::complete_page`].
    FetchPage(PageTicket),
    /// Fetch a tile resource and hand it to [`GallerySession::complete_resource`].
    FetchResource(ResourceTicket),
}

/// Which body the view should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryBody {
    /// Nothing matched and nothing is loading.
    Empty,
    /// Page fetch failed; show the message with a retry affordance.
    Error(String),
    /// Show the column grid.
    Grid,
}

/// Everything the view needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySnapshot {
    /// Items laid out in columns.
    pub columns: ColumnAssignment,
    /// A page fetch is outstanding.
    pub loading: bool,
    /// Message of the last page failure.
    pub error: Option<String>,
    /// Another page may exist.
    pub has_more: bool,
    /// Body to render.
    pub body: GalleryBody,
    /// Anchor to render after the grid, if the feed can grow.
    pub anchor: Option<AnchorId>,
}

/// Tunables of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryOptions {
    /// Items requested per page.
    pub page_size: PageSize,
    /// Anchor margin and threshold.
    pub sentinel: SentinelConfig,
    /// Viewport widths at which a column is added.
    pub breakpoints: ColumnBreakpoints,
    /// Resolution tiles ask for.
    pub resolution: Resolution,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            sentinel: SentinelConfig::default(),
            breakpoints: ColumnBreakpoints::default(),
            resolution: Resolution::Preview,
        }
    }
}

impl From<&ResolvedConfig> for GalleryOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            page_size: config.page_size,
            sentinel: config.sentinel,
            breakpoints: config.breakpoints.clone(),
            resolution: config.resolution,
        }
    }
}

/// Counts of work done by [`GallerySession::drive`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveReport {
    /// Page fetches performed.
    pub pages: usize,
    /// Resource fetches performed.
    pub resources: usize,
    /// Resource results dropped as stale.
    pub stale: usize,
}

/// One gallery view's feed, layout and tiles.
#[derive(Debug)]
pub struct GallerySession<S: HandleStore> {
    controller: FeedController,
    sentinel: ScrollSentinel,
    tiles: TileResourceLoader<S>,
    breakpoints: ColumnBreakpoints,
    column_count: ColumnCount,
    layout: ColumnAssignment,
    next_anchor: u64,
    anchor: Option<AnchorId>,
}

impl<S: HandleStore> GallerySession<S> {
    /// Session with no filter applied. Nothing is fetched until
    /// [`on_filter_change`](Self::on_filter_change).
    pub fn new(options: GalleryOptions, store: S) -> Self {
        let column_count = ColumnCount::default();
        Self {
            controller: FeedController::new(options.page_size),
            sentinel: ScrollSentinel::new(options.sentinel),
            tiles: TileResourceLoader::new(store, options.resolution),
            breakpoints: options.breakpoints,
            column_count,
            layout: ColumnAssignment::empty(column_count),
            next_anchor: 0,
            anchor: None,
        }
    }

    // ===== Inbound =====

    /// Apply a filter. A changed filter resets the feed, unmounts every tile
    /// and fetches the first page.
    pub fn on_filter_change(&mut self, spec: FilterSpec) -> Vec<Effect> {
        let Some(ticket) = self.controller.set_filter(spec) else {
            return Vec::new();
        };
        self.tiles.sync(&[]);
        self.relayout();
        self.refresh_anchor();
        vec![Effect::FetchPage(ticket)]
    }

    /// Viewport width changed. Returns `true` when the column count changed
    /// and the layout was recomputed.
    pub fn on_viewport_resize(&mut self, width: u32) -> bool {
        let count = self.breakpoints.column_count(width);
        self.set_column_count(count)
    }

    /// Force a column count. Returns `true` when it changed.
    pub fn set_column_count(&mut self, count: ColumnCount) -> bool {
        if count == self.column_count {
            return false;
        }
        debug!(from = self.column_count.get(), to = count.get(), "Column count changed");
        self.column_count = count;
        self.relayout();
        true
    }

    /// The view reported anchor visibility.
    pub fn on_anchor_observed(&mut self, anchor: AnchorId, intersection: Intersection) -> Vec<Effect> {
        let gate = SentinelGate::from(&self.controller);
        if self.sentinel.on_intersection(anchor, intersection, gate).is_none() {
            return Vec::new();
        }
        self.next_page()
    }

    /// The view scrolled; measure the anchor against the viewport.
    pub fn on_scroll(&mut self, anchor: AnchorId, bounds: Bounds, viewport: Viewport) -> Vec<Effect> {
        let intersection = Intersection::measure(bounds, viewport, self.sentinel.config());
        self.on_anchor_observed(anchor, intersection)
    }

    /// Retry after a page failure.
    pub fn retry(&mut self) -> Vec<Effect> {
        let effects: Vec<Effect> = self
            .controller
            .retry()
            .map(Effect::FetchPage)
            .into_iter()
            .collect();
        self.refresh_anchor();
        effects
    }

    /// A tile was activated. Feed state is not touched; the item is handed
    /// back for the host's selection handler.
    pub fn on_item_activated(&self, id: &ItemId) -> Option<&FeedItem> {
        let item = self.controller.item(id);
        if item.is_some() {
            info!(item = %id, "Item activated");
        }
        item
    }

    /// Tear the view down: every handle is released and the sentinel stops.
    pub fn teardown(&mut self) {
        self.tiles.teardown_all();
        self.sentinel.disconnect();
        self.anchor = None;
    }

    // ===== Results =====

    /// Hand back the result of an [`Effect::FetchPage`].
    pub fn complete_page(
        &mut self,
        ticket: &PageTicket,
        result: Result<Vec<FeedItem>, TransportError>,
    ) -> Vec<Effect> {
        let outcome = self.controller.complete_page(ticket, result);
        let effects = match outcome {
            PageOutcome::Stale => return Vec::new(),
            PageOutcome::Failed => Vec::new(),
            PageOutcome::Appended { .. } => {
                self.relayout();
                self.tiles
                    .sync(self.controller.items())
                    .into_iter()
                    .map(Effect::FetchResource)
                    .collect()
            }
        };
        self.refresh_anchor();
        effects
    }

    /// Hand back the result of an [`Effect::FetchResource`].
    pub fn complete_resource(
        &mut self,
        ticket: &ResourceTicket,
        result: Result<Vec<u8>, TransportError>,
    ) -> ResourceOutcome {
        self.tiles.complete(ticket, result)
    }

    /// Execute `effects`, and every effect they lead to, against providers.
    pub fn drive<P, R>(&mut self, effects: Vec<Effect>, pages: &mut P, resources: &mut R) -> DriveReport
    where
        P: PageProvider,
        R: ResourceProvider,
    {
        let mut report = DriveReport::default();
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::FetchPage(ticket) => {
                    report.pages += 1;
                    let result = pages.fetch_page(ticket.filter(), ticket.window());
                    queue.extend(self.complete_page(&ticket, result));
                }
                Effect::FetchResource(ticket) => {
                    report.resources += 1;
                    let result = resources.fetch_resource(ticket.media(), ticket.resolution());
                    if self.complete_resource(&ticket, result) == ResourceOutcome::Stale {
                        report.stale += 1;
                    }
                }
            }
        }

        report
    }

    // ===== Outbound =====

    /// Everything the view needs for the next render.
    pub fn snapshot(&self) -> GallerySnapshot {
        let feed = self.controller.snapshot();
        GallerySnapshot {
            columns: self.layout.clone(),
            body: body_for(&feed),
            loading: feed.loading,
            error: feed.error,
            has_more: feed.has_more,
            anchor: self.anchor,
        }
    }

    /// Feed controller state.
    pub fn feed(&self) -> FeedSnapshot {
        self.controller.snapshot()
    }

    /// Current column layout.
    pub fn layout(&self) -> &ColumnAssignment {
        &self.layout
    }

    /// Columns in use.
    pub fn column_count(&self) -> ColumnCount {
        self.column_count
    }

    /// Canonical item sequence.
    pub fn items(&self) -> &[FeedItem] {
        self.controller.items()
    }

    /// Tile for `id`, when mounted.
    pub fn tile(&self, id: &ItemId) -> Option<&TileSlot> {
        self.tiles.tile(id)
    }

    /// Handle store shared by the tiles.
    pub fn store(&self) -> &S {
        self.tiles.store()
    }

    /// Anchor currently rendered, if any.
    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    // ===== Internals =====

    fn next_page(&mut self) -> Vec<Effect> {
        let effects: Vec<Effect> = self
            .controller
            .request_next_page()
            .map(Effect::FetchPage)
            .into_iter()
            .collect();
        self.refresh_anchor();
        effects
    }

    fn relayout(&mut self) {
        self.layout = layout_columns(self.controller.items(), self.column_count);
    }

    /// The anchor is rendered only while more pages can be requested and
    /// the grid is non-empty; every render gets a fresh identity.
    fn refresh_anchor(&mut self) {
        let rendered = self.controller.has_more()
            && !self.controller.is_fetching()
            && !self.controller.items().is_empty();

        if rendered {
            self.next_anchor += 1;
            let anchor = AnchorId(self.next_anchor);
            self.anchor = Some(anchor);
            self.sentinel.observe(anchor);
        } else {
            self.anchor = None;
            self.sentinel.disconnect();
        }
    }
}

fn body_for(feed: &FeedSnapshot) -> GalleryBody {
    match &feed.error {
        Some(message) => GalleryBody::Error(message.clone()),
        None if feed.item_count == 0 && !feed.loading => GalleryBody::Empty,
        None => GalleryBody::Grid,
    }
}

#[cfg(test)]
#[path = "gallery_tests.rs"]
mod tests;
