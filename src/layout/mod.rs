//! Column-balanced tile layout.
//!
//! Greedy shortest-column placement: each item, in feed order, goes to the
//! column with the smallest accumulated height (lowest index wins ties).
//! The assignment is always recomputed from scratch; incremental placement
//! would drift from this result once item heights are revised.

pub mod breakpoints;

pub use breakpoints::{ColumnBreakpoints, InvalidBreakpoints};

use crate::model::FeedItem;

/// Aspect ratio assumed for media without known dimensions (portrait 2:3).
pub const DEFAULT_ASPECT_RATIO: f64 = 2.0 / 3.0;

/// Number of layout columns. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnCount(usize);

/// Error returned when a column count of zero is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("column count must be >= 1")]
pub struct InvalidColumnCount;

impl ColumnCount {
    /// A single column.
    pub const ONE: Self = Self(1);

    /// Smart constructor that rejects zero.
    pub fn new(count: usize) -> Result<Self, InvalidColumnCount> {
        if count == 0 {
            Err(InvalidColumnCount)
        } else {
            Ok(Self(count))
        }
    }

    /// Number of columns.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for ColumnCount {
    fn default() -> Self {
        Self(4)
    }
}

/// Relative rendered height of an item at unit column width.
pub fn height_contribution(item: &FeedItem) -> f64 {
    let aspect = item
        .primary_media()
        .and_then(|m| m.aspect_ratio())
        .unwrap_or(DEFAULT_ASPECT_RATIO);
    1.0 / aspect
}

/// One column of the layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    items: Vec<FeedItem>,
    height: f64,
}

impl Column {
    /// Items in feed order.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Accumulated height of the column's items.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the column holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Items partitioned into columns.
///
/// # Invariants
/// - `columns.len()` equals the column count used to build it
/// - every input item appears in exactly one column
/// - within a column, items keep their feed order
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssignment {
    columns: Vec<Column>,
}

impl ColumnAssignment {
    /// Assignment with `count` empty columns.
    pub fn empty(count: ColumnCount) -> Self {
        Self {
            columns: vec![Column::default(); count.get()],
        }
    }

    /// Columns, left to right.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns.
    pub fn column_count(&self) -> ColumnCount {
        ColumnCount(self.columns.len())
    }

    /// Total number of items across all columns.
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Height of the tallest column.
    pub fn max_height(&self) -> f64 {
        self.columns.iter().map(Column::height).fold(0.0, f64::max)
    }

    /// Column index holding the item with `id`, if laid out.
    pub fn column_of(&self, id: &crate::model::ItemId) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.items.iter().any(|item| &item.id == id))
    }
}

impl Default for ColumnAssignment {
    fn default() -> Self {
        Self::empty(ColumnCount::default())
    }
}

/// Assign `items` to `count` columns by greedy shortest-column placement.
pub fn layout_columns(items: &[FeedItem], count: ColumnCount) -> ColumnAssignment {
    let mut assignment = ColumnAssignment::empty(count);

    for item in items {
        let target = shortest_column(&assignment.columns);
        let column = &mut assignment.columns[target];
        column.height += height_contribution(item);
        column.items.push(item.clone());
    }

    assignment
}

/// Index of the column with minimum height; strict comparison keeps the
/// lowest index on ties.
fn shortest_column(columns: &[Column]) -> usize {
    let mut best = 0;
    for (index, column) in columns.iter().enumerate().skip(1) {
        if column.height < columns[best].height {
            best = index;
        }
    }
    best
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
