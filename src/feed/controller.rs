//! Pagination state machine.
//!
//! The controller owns the canonical item sequence and the page cursor for
//! one gallery view. It never performs I/O: starting a fetch yields a
//! [`PageTicket`], and the host hands the provider's answer back through
//! [`FeedController::complete_page`] together with that ticket. Tickets carry
//! the epoch that issued them, so answers for an abandoned filter are
//! recognised and dropped.

use crate::model::{FeedItem, FilterSpec, ItemId, PageWindow, TransportError};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Generation counter of filter epochs. Bumped on every effective filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// Raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch-{}", self.0)
    }
}

/// Number of items requested per page. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

/// Error returned when a page size of zero is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page size must be >= 1")]
pub struct InvalidPageSize;

impl PageSize {
    /// Smart constructor that rejects zero.
    pub fn new(size: usize) -> Result<Self, InvalidPageSize> {
        if size == 0 {
            Err(InvalidPageSize)
        } else {
            Ok(Self(size))
        }
    }

    /// Items per page.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(24)
    }
}

/// Pagination position within an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Epoch the cursor belongs to.
    pub epoch: Epoch,
    /// Zero-based index of the next page to fetch.
    pub page_index: usize,
    /// Items per page.
    pub page_size: PageSize,
}

impl PageCursor {
    fn start(epoch: Epoch, page_size: PageSize) -> Self {
        Self {
            epoch,
            page_index: 0,
            page_size,
        }
    }

    /// Offset of the first item of the current page.
    pub fn skip(&self) -> usize {
        self.page_index * self.page_size.get()
    }

    /// Window of the current page.
    pub fn window(&self) -> PageWindow {
        PageWindow {
            skip: self.skip(),
            take: self.page_size.get(),
        }
    }
}

/// Lifecycle of the feed within the current epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// Ready to fetch the next page on request.
    Idle,
    /// A page fetch is outstanding.
    Fetching,
    /// The last fetch failed; pagination halts until retried.
    Error,
    /// A short page was received; nothing more to fetch for this epoch.
    Exhausted,
}

/// A page fetch the host must perform.
///
/// Hand the result back with [`FeedController::complete_page`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageTicket {
    epoch: Epoch,
    page_index: usize,
    filter: FilterSpec,
    window: PageWindow,
}

impl PageTicket {
    /// Epoch that issued the ticket.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Zero-based page number.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Predicates to send; the window is separate.
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Slice of the filtered sequence to fetch.
    pub fn window(&self) -> PageWindow {
        self.window
    }
}

/// What [`FeedController::complete_page`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Items were appended to the sequence.
    Appended {
        /// Items actually added.
        added: usize,
        /// Items dropped because their id was already in the sequence.
        duplicates: usize,
    },
    /// The fetch failed; the controller is now in [`FeedState::Error`].
    Failed,
    /// The ticket belongs to an abandoned epoch or an already-settled fetch.
    Stale,
}

/// Outbound view of the controller for the embedding view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Lifecycle state.
    pub state: FeedState,
    /// Current filter epoch.
    pub epoch: Epoch,
    /// A page fetch is outstanding.
    pub loading: bool,
    /// Message of the last failure, while in the error state.
    pub error: Option<String>,
    /// Another page may exist.
    pub has_more: bool,
    /// Items in the canonical sequence.
    pub item_count: usize,
}

/// Owner of the canonical item sequence and page cursor.
#[derive(Debug)]
pub struct FeedController {
    filter: Option<FilterSpec>,
    cursor: PageCursor,
    state: FeedState,
    has_more: bool,
    items: Vec<FeedItem>,
    seen: HashSet<ItemId>,
    last_error: Option<TransportError>,
}

impl FeedController {
    /// Create a controller with no filter applied yet.
    ///
    /// Nothing is fetched until the first [`set_filter`](Self::set_filter).
    pub fn new(page_size: PageSize) -> Self {
        Self {
            filter: None,
            cursor: PageCursor::start(Epoch::default(), page_size),
            state: FeedState::Idle,
            has_more: false,
            items: Vec::new(),
            seen: HashSet::new(),
            last_error: None,
        }
    }

    /// Apply a filter. A spec different from the current one starts a new
    /// epoch and immediately issues the fetch of page 0.
    ///
    /// Returns `None` when `spec` equals the current filter.
    pub fn set_filter(&mut self, spec: FilterSpec) -> Option<PageTicket> {
        if self.filter.as_ref() == Some(&spec) {
            debug!(epoch = %self.cursor.epoch, "Filter unchanged; keeping epoch");
            return None;
        }

        let epoch = self.cursor.epoch.next();
        info!(%epoch, filter = ?spec, "Filter changed; starting new epoch");

        self.filter = Some(spec);
        self.cursor = PageCursor::start(epoch, self.cursor.page_size);
        self.items.clear();
        self.seen.clear();
        self.last_error = None;
        self.has_more = true;
        self.state = FeedState::Idle;

        self.request_next_page()
    }

    /// Issue the fetch of the page under the cursor.
    ///
    /// No-op unless the feed is [`FeedState::Idle`] and has more pages, so
    /// repeated calls while a fetch is outstanding issue nothing.
    pub fn request_next_page(&mut self) -> Option<PageTicket> {
        if self.state != FeedState::Idle || !self.has_more {
            debug!(
                state = ?self.state,
                has_more = self.has_more,
                "Next page not requested"
            );
            return None;
        }
        self.issue()
    }

    /// Re-issue the failed page's fetch. Only valid in [`FeedState::Error`].
    pub fn retry(&mut self) -> Option<PageTicket> {
        if self.state != FeedState::Error {
            return None;
        }
        info!(
            epoch = %self.cursor.epoch,
            page = self.cursor.page_index,
            "Retrying page fetch"
        );
        self.last_error = None;
        self.has_more = true;
        self.issue()
    }

    fn issue(&mut self) -> Option<PageTicket> {
        let filter = self.filter.clone()?;
        self.state = FeedState::Fetching;
        let ticket = PageTicket {
            epoch: self.cursor.epoch,
            page_index: self.cursor.page_index,
            filter,
            window: self.cursor.window(),
        };
        debug!(
            epoch = %ticket.epoch,
            page = ticket.page_index,
            skip = ticket.window.skip,
            take = ticket.window.take,
            "Issuing page fetch"
        );
        Some(ticket)
    }

    fn is_current(&self, ticket: &PageTicket) -> bool {
        self.state == FeedState::Fetching
            && ticket.epoch == self.cursor.epoch
            && ticket.page_index == self.cursor.page_index
    }

    /// Settle a fetch previously issued by this controller.
    pub fn complete_page(
        &mut self,
        ticket: &PageTicket,
        result: Result<Vec<FeedItem>, TransportError>,
    ) -> PageOutcome {
        if !self.is_current(ticket) {
            debug!(
                ticket_epoch = %ticket.epoch,
                current_epoch = %self.cursor.epoch,
                page = ticket.page_index,
                "Discarding stale page result"
            );
            return PageOutcome::Stale;
        }

        let mut page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    epoch = %ticket.epoch,
                    page = ticket.page_index,
                    error = %err,
                    "Page fetch failed"
                );
                self.last_error = Some(err);
                self.has_more = false;
                self.state = FeedState::Error;
                return PageOutcome::Failed;
            }
        };

        let page_size = self.cursor.page_size.get();
        if page.len() > page_size {
            warn!(
                returned = page.len(),
                page_size, "Provider returned more items than requested; truncating"
            );
            page.truncate(page_size);
        }

        let returned = page.len();
        let mut added = 0;
        for item in page {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
                added += 1;
            }
        }
        let duplicates = returned - added;
        if duplicates > 0 {
            warn!(duplicates, page = ticket.page_index, "Dropped duplicate items");
        }

        self.has_more = returned == page_size;
        self.cursor.page_index += 1;
        self.state = if self.has_more {
            FeedState::Idle
        } else {
            FeedState::Exhausted
        };

        info!(
            epoch = %ticket.epoch,
            page = ticket.page_index,
            added,
            total = self.items.len(),
            has_more = self.has_more,
            "Page appended"
        );

        PageOutcome::Appended { added, duplicates }
    }

    /// Canonical item sequence of the current epoch, in arrival order.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Item with `id`, if it is in the sequence.
    pub fn item(&self, id: &ItemId) -> Option<&FeedItem> {
        if !self.seen.contains(id) {
            return None;
        }
        self.items.iter().find(|item| &item.id == id)
    }

    /// Filter of the current epoch; `None` before the first one is applied.
    pub fn filter(&self) -> Option<&FilterSpec> {
        self.filter.as_ref()
    }

    /// Current page cursor.
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Current lifecycle state.
    pub fn state(&self) -> FeedState {
        self.state
    }

    /// Whether another page may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a page fetch is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.state == FeedState::Fetching
    }

    /// Error of the last failed fetch, while in the error state.
    pub fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    /// Outbound view of the current state.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            state: self.state,
            epoch: self.cursor.epoch,
            loading: self.is_fetching(),
            error: self.last_error.as_ref().map(ToString::to_string),
            has_more: self.has_more,
            item_count: self.items.len(),
        }
    }
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
