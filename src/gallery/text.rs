//! Plain-text rendering of a gallery snapshot.

use super::{GalleryBody, GallerySnapshot};
use std::fmt::Write;

/// Render `snapshot` as one line per column followed by a status line.
///
/// ```text
/// [0] 3.00 | a, c, e
/// [1] 2.00 | b, d
/// 5 items, exhausted
/// ```
pub fn render(snapshot: &GallerySnapshot) -> String {
    let mut out = String::new();

    match &snapshot.body {
        GalleryBody::Empty => out.push_str("No photos match this filter.\n"),
        GalleryBody::Error(message) => {
            let _ = writeln!(out, "Error: {message} (retry available)");
        }
        GalleryBody::Grid => {
            for (index, column) in snapshot.columns.columns().iter().enumerate() {
                let ids: Vec<String> = column.items().iter().map(|i| i.id.to_string()).collect();
                let _ = writeln!(out, "[{index}] {:.2} | {}", column.height(), ids.join(", "));
            }
        }
    }

    let status = if snapshot.loading {
        "loading"
    } else if snapshot.has_more {
        "more available"
    } else if snapshot.error.is_some() {
        "stopped"
    } else {
        "exhausted"
    };
    let _ = writeln!(out, "{} items, {status}", snapshot.columns.item_count());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{layout_columns, ColumnCount};
    use crate::model::{FeedItem, ItemId};

    fn snapshot(ids: &[&str], body: GalleryBody, has_more: bool) -> GallerySnapshot {
        let items: Vec<FeedItem> = ids
            .iter()
            .map(|id| FeedItem::new(ItemId::new(*id).expect("valid item id"), *id))
            .collect();
        GallerySnapshot {
            columns: layout_columns(&items, ColumnCount::new(2).expect("non-zero")),
            loading: false,
            error: None,
            has_more,
            body,
            anchor: None,
        }
    }

    #[test]
    fn grid_lists_columns_and_status() {
        let text = render(&snapshot(&["a", "b", "c"], GalleryBody::Grid, true));
        insta::assert_snapshot!(text.trim_end(), @r"
        [0] 3.00 | a, c
        [1] 1.50 | b
        3 items, more available
        ");
    }

    #[test]
    fn empty_body_has_message() {
        let text = render(&snapshot(&[], GalleryBody::Empty, false));
        insta::assert_snapshot!(text.trim_end(), @r"
        No photos match this filter.
        0 items, exhausted
        ");
    }

    #[test]
    fn error_body_shows_message() {
        let mut snap = snapshot(&[], GalleryBody::Error("Network error: down".into()), false);
        snap.error = Some("Network error: down".into());
        assert_eq!(
            render(&snap),
            "Error: Network error: down (retry available)\n0 items, stopped\n"
        );
    }
}
