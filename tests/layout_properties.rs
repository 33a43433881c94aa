//! Property-based tests for the column layout.
//!
//! Tests validate:
//! 1. Every item lands in exactly one column, in feed order
//! 2. Column spread never exceeds the tallest single item
//! 3. Breakpoints never reduce the column count as width grows

use gallery_feed::layout::{
    height_contribution, layout_columns, ColumnBreakpoints, ColumnCount,
};
use gallery_feed::model::{FeedItem, ItemId, MediaId, MediaRef};
use proptest::prelude::*;

fn item(index: usize, dims: Option<(u32, u32)>) -> FeedItem {
    let id = ItemId::new(format!("item-{index}")).expect("valid item id");
    let media = MediaRef::new(MediaId::new(format!("file-{index}")).expect("valid media id"));
    let media = match dims {
        Some((w, h)) => media.with_dimensions(w, h),
        None => media,
    };
    FeedItem::new(id, format!("Photo {index}")).with_media(media)
}

fn items_strategy() -> impl Strategy<Value = Vec<FeedItem>> {
    prop::collection::vec(prop::option::of((1u32..4000, 1u32..4000)), 0..60).prop_map(|dims| {
        dims.into_iter()
            .enumerate()
            .map(|(i, d)| item(i, d))
            .collect()
    })
}

// ===== Property 1: Coverage and order =====

proptest! {
    #[test]
    fn every_item_assigned_once_in_order(items in items_strategy(), count in 1usize..8) {
        let count = ColumnCount::new(count).expect("non-zero");
        let assignment = layout_columns(&items, count);

        prop_assert_eq!(assignment.columns().len(), count.get());
        prop_assert_eq!(assignment.item_count(), items.len());

        for column in assignment.columns() {
            let positions: Vec<usize> = column
                .items()
                .iter()
                .map(|placed| {
                    items
                        .iter()
                        .position(|i| i.id == placed.id)
                        .expect("placed item comes from input")
                })
                .collect();
            prop_assert!(
                positions.windows(2).all(|w| w[0] < w[1]),
                "Column items must keep feed order: {:?}",
                positions
            );
        }

        for input in &items {
            prop_assert!(assignment.column_of(&input.id).is_some());
        }
    }

    #[test]
    fn layout_is_deterministic(items in items_strategy(), count in 1usize..8) {
        let count = ColumnCount::new(count).expect("non-zero");
        prop_assert_eq!(layout_columns(&items, count), layout_columns(&items, count));
    }
}

// ===== Property 2: Balance =====

proptest! {
    #[test]
    fn spread_bounded_by_tallest_item(items in items_strategy(), count in 1usize..8) {
        let count = ColumnCount::new(count).expect("non-zero");
        let assignment = layout_columns(&items, count);

        let tallest = items.iter().map(height_contribution).fold(0.0, f64::max);
        let heights: Vec<f64> = assignment.columns().iter().map(|c| c.height()).collect();
        let min = heights.iter().copied().fold(f64::INFINITY, f64::min);
        let max = heights.iter().copied().fold(0.0, f64::max);

        prop_assert!(
            max - min <= tallest + 1e-9,
            "spread {} exceeds tallest item {}",
            max - min,
            tallest
        );
    }

    #[test]
    fn column_height_is_sum_of_contributions(items in items_strategy(), count in 1usize..8) {
        let count = ColumnCount::new(count).expect("non-zero");
        let assignment = layout_columns(&items, count);

        for column in assignment.columns() {
            let sum: f64 = column.items().iter().map(height_contribution).sum();
            prop_assert!((column.height() - sum).abs() < 1e-6);
        }
    }
}

// ===== Property 3: Breakpoints =====

proptest! {
    #[test]
    fn wider_viewport_never_has_fewer_columns(a in 0u32..3000, b in 0u32..3000) {
        let breakpoints = ColumnBreakpoints::default();
        let (narrow, wide) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(breakpoints.column_count(narrow) <= breakpoints.column_count(wide));
    }
}
