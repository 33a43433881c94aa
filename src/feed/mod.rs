//! Feed pagination: the controller state machine and the scroll sentinel
//! that asks it for more.

pub mod controller;
pub mod sentinel;

pub use controller::{
    Epoch, FeedController, FeedSnapshot, FeedState, InvalidPageSize, PageCursor, PageOutcome,
    PageSize, PageTicket,
};
pub use sentinel::{
    AnchorId, Bounds, Intersection, NeedMore, ScrollSentinel, SentinelConfig, SentinelGate,
    Viewport,
};
