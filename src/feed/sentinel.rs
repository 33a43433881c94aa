//! Scroll sentinel: turns anchor visibility into "need more" signals.
//!
//! The host reports where the anchor (the element after the last tile) sits
//! relative to the viewport. The sentinel emits [`NeedMore`] once per
//! transition from not-intersecting to intersecting, and stays silent while
//! the feed is fetching or exhausted. Observation is tied to one anchor
//! identity at a time; reports for any other anchor are ignored.

use super::controller::{FeedController, FeedSnapshot, FeedState};
use tracing::debug;

/// Lookahead margin and visibility threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelConfig {
    /// Pixels the viewport is extended by on both ends before testing overlap.
    pub margin_px: f64,
    /// Fraction of the anchor that must overlap to count as intersecting.
    pub threshold: f64,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            margin_px: 100.0,
            threshold: 0.1,
        }
    }
}

/// Identity of an anchor element. A new identity means the list re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId(pub u64);

/// Visible vertical slice of the scroll container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Scroll offset of the top edge.
    pub scroll_top: f64,
    /// Visible height.
    pub height: f64,
}

/// Vertical extent of the anchor in content coordinates, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Offset of the top edge.
    pub top: f64,
    /// Height; zero for an empty marker.
    pub height: f64,
}

/// Result of testing an anchor against the margin-extended viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Overlapping fraction of the anchor, `0.0..=1.0`.
    pub ratio: f64,
    /// Whether the overlap meets the threshold.
    pub is_intersecting: bool,
}

impl Intersection {
    /// Measure how much of `anchor` lies inside `viewport` extended by the
    /// configured margin.
    ///
    /// A zero-height anchor counts as fully visible when its top edge lies
    /// inside the extended viewport.
    pub fn measure(anchor: Bounds, viewport: Viewport, config: &SentinelConfig) -> Self {
        let root_top = viewport.scroll_top - config.margin_px;
        let root_bottom = viewport.scroll_top + viewport.height + config.margin_px;

        if anchor.height <= 0.0 {
            let inside = anchor.top >= root_top && anchor.top <= root_bottom;
            return Self {
                ratio: if inside { 1.0 } else { 0.0 },
                is_intersecting: inside,
            };
        }

        let anchor_bottom = anchor.top + anchor.height;
        let overlap = (anchor_bottom.min(root_bottom) - anchor.top.max(root_top)).max(0.0);
        let ratio = (overlap / anchor.height).min(1.0);

        Self {
            ratio,
            is_intersecting: overlap > 0.0 && ratio >= config.threshold,
        }
    }

    /// Anchor fully inside the viewport.
    pub fn visible() -> Self {
        Self {
            ratio: 1.0,
            is_intersecting: true,
        }
    }

    /// An intersection that is definitely not visible.
    pub fn hidden() -> Self {
        Self {
            ratio: 0.0,
            is_intersecting: false,
        }
    }
}

/// Feed conditions under which the sentinel must stay silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelGate {
    /// A page fetch is outstanding.
    pub fetching: bool,
    /// Another page may exist.
    pub has_more: bool,
}

impl SentinelGate {
    /// Whether a visible anchor may ask for more.
    pub fn is_open(&self) -> bool {
        !self.fetching && self.has_more
    }
}

impl From<&FeedController> for SentinelGate {
    fn from(controller: &FeedController) -> Self {
        Self {
            fetching: controller.is_fetching(),
            has_more: controller.has_more(),
        }
    }
}

impl From<&FeedSnapshot> for SentinelGate {
    fn from(snapshot: &FeedSnapshot) -> Self {
        Self {
            fetching: snapshot.state == FeedState::Fetching,
            has_more: snapshot.has_more,
        }
    }
}

/// Signal that the anchor came into view and another page is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeedMore {
    /// Anchor that came into view.
    pub anchor: AnchorId,
}

/// Edge-triggered visibility observer for one anchor at a time.
#[derive(Debug, Clone)]
pub struct ScrollSentinel {
    config: SentinelConfig,
    anchor: Option<AnchorId>,
    was_intersecting: bool,
}

impl ScrollSentinel {
    /// Sentinel observing nothing yet.
    pub fn new(config: SentinelConfig) -> Self {
        Self {
            config,
            anchor: None,
            was_intersecting: false,
        }
    }

    /// Margin and threshold in use.
    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    /// Start observing `anchor`. A different identity replaces the previous
    /// subscription and forgets its visibility history.
    ///
    /// Returns `true` when the subscription changed.
    pub fn observe(&mut self, anchor: AnchorId) -> bool {
        if self.anchor == Some(anchor) {
            return false;
        }
        debug!(?anchor, previous = ?self.anchor, "Sentinel re-subscribed");
        self.anchor = Some(anchor);
        self.was_intersecting = false;
        true
    }

    /// Stop observing. Later reports are ignored until [`observe`](Self::observe).
    pub fn disconnect(&mut self) {
        if let Some(anchor) = self.anchor.take() {
            debug!(?anchor, "Sentinel disconnected");
        }
        self.was_intersecting = false;
    }

    /// Anchor currently observed, if any.
    pub fn observed(&self) -> Option<AnchorId> {
        self.anchor
    }

    /// Feed one visibility report for `anchor`.
    ///
    /// While the gate is closed the subscription is treated as suspended:
    /// no signal, and the visibility history is reset, so an anchor that is
    /// still on screen once the gate reopens fires again.
    pub fn on_intersection(
        &mut self,
        anchor: AnchorId,
        intersection: Intersection,
        gate: SentinelGate,
    ) -> Option<NeedMore> {
        if self.anchor != Some(anchor) {
            debug!(?anchor, observed = ?self.anchor, "Ignoring report for unobserved anchor");
            return None;
        }

        if !gate.is_open() {
            debug!(?gate, "Sentinel suppressed");
            self.was_intersecting = false;
            return None;
        }

        let entered = intersection.is_intersecting && !self.was_intersecting;
        self.was_intersecting = intersection.is_intersecting;

        if entered {
            debug!(?anchor, ratio = intersection.ratio, "Anchor entered viewport");
            Some(NeedMore { anchor })
        } else {
            None
        }
    }

    /// Measure geometry and feed the result to [`on_intersection`](Self::on_intersection).
    pub fn on_scroll(
        &mut self,
        anchor: AnchorId,
        bounds: Bounds,
        viewport: Viewport,
        gate: SentinelGate,
    ) -> Option<NeedMore> {
        let intersection = Intersection::measure(bounds, viewport, &self.config);
        self.on_intersection(anchor, intersection, gate)
    }
}

impl Default for ScrollSentinel {
    fn default() -> Self {
        Self::new(SentinelConfig::default())
    }
}
