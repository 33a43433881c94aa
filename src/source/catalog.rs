//! JSONL-backed page provider.
//!
//! One feed item per line, in the provider's JSON shape. Blank lines are
//! ignored; malformed lines and repeated ids are skipped and recorded so the
//! caller can report them.

use super::{CatalogError, PageProvider};
use crate::model::{FeedItem, FilterSpec, ItemId, NumericRange, PageWindow, TransportError};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

/// In-memory catalog that pages through its items.
#[derive(Debug, Default)]
pub struct JsonlCatalog {
    items: Vec<FeedItem>,
    skipped: Vec<CatalogError>,
}

impl JsonlCatalog {
    /// Catalog over already-parsed items.
    pub fn from_items(items: Vec<FeedItem>) -> Self {
        Self {
            items,
            skipped: Vec::new(),
        }
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::FileNotFound` if the path does not exist and
    /// `CatalogError::Io` for read failures. Malformed lines are not errors;
    /// see [`skipped`](Self::skipped).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Parse a catalog from any buffered reader.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, CatalogError> {
        let mut items = Vec::new();
        let mut skipped = Vec::new();
        let mut seen: HashSet<ItemId> = HashSet::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<FeedItem>(&line) {
                Ok(item) if !seen.insert(item.id.clone()) => {
                    warn!(line = line_number, id = %item.id, "Skipping duplicate catalog item");
                    skipped.push(CatalogError::DuplicateId {
                        line: line_number,
                        id: item.id.to_string(),
                    });
                }
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(line = line_number, error = %e, "Skipping malformed catalog line");
                    skipped.push(CatalogError::InvalidLine {
                        line: line_number,
                        message: e.to_string(),
                    });
                }
            }
        }

        debug!(items = items.len(), skipped = skipped.len(), "Catalog loaded");
        Ok(Self { items, skipped })
    }

    /// Every loaded item, unfiltered.
    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Lines that were skipped while loading.
    pub fn skipped(&self) -> &[CatalogError] {
        &self.skipped
    }
}

impl PageProvider for JsonlCatalog {
    fn fetch_page(
        &mut self,
        filter: &FilterSpec,
        window: PageWindow,
    ) -> Result<Vec<FeedItem>, TransportError> {
        let query = filter.with_window(window);
        debug!(params = ?query.query_pairs(), "Serving catalog page");
        Ok(self
            .items
            .iter()
            .filter(|item| matches(&query.filter, item))
            .skip(query.window.skip)
            .take(query.window.take)
            .cloned()
            .collect())
    }
}

/// Fixture matcher for local catalogs. Geo predicates are not evaluated.
fn matches(filter: &FilterSpec, item: &FeedItem) -> bool {
    let contains = |needle: &Option<String>, hay: &str| {
        needle
            .as_ref()
            .is_none_or(|n| hay.to_lowercase().contains(&n.to_lowercase()))
    };
    let equals = |wanted: &Option<String>, actual: &Option<String>| match wanted {
        None => true,
        Some(w) => actual
            .as_ref()
            .is_some_and(|a| a.eq_ignore_ascii_case(w)),
    };
    let in_range = |range: &NumericRange, value: Option<f64>| {
        if range.is_open() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        range.min.is_none_or(|min| v >= min) && range.max.is_none_or(|max| v <= max)
    };

    let capture = &item.capture;
    let taken_in_range = match item.date_taken {
        Some(taken) => {
            filter.date_taken.start.is_none_or(|s| taken >= s)
                && filter.date_taken.end.is_none_or(|e| taken <= e)
        }
        None => filter.date_taken.start.is_none() && filter.date_taken.end.is_none(),
    };

    contains(&filter.title, &item.title)
        && filter.liked.is_none_or(|liked| item.liked == liked)
        && equals(&filter.camera_make, &capture.camera_make)
        && equals(&filter.camera_model, &capture.camera_model)
        && equals(&filter.lens_make, &capture.lens_make)
        && equals(&filter.lens_model, &capture.lens_model)
        && in_range(&filter.focal_length, capture.focal_length)
        && in_range(&filter.f_number, capture.f_number)
        && in_range(&filter.iso, capture.iso.map(f64::from))
        && in_range(&filter.exposure_time, capture.exposure_time)
        && taken_in_range
        && filter.tags.iter().all(|tag| item.tags.contains(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{"id":"p1","title":"Harbour at dusk","liked":true,"iso":100,"tags":["sea"]}
{"id":"p2","title":"Desert road","iso":800,"tags":["sand","road"]}

{"id":"p3","title":"Harbour crane","iso":3200,"tags":["sea","industry"]}
{"id":"p4","title":"Dunes","liked":true,"tags":["sand"]}
"#;

    fn catalog() -> JsonlCatalog {
        JsonlCatalog::from_reader(CATALOG.as_bytes()).expect("valid catalog")
    }

    fn titles(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    fn window(skip: usize, take: usize) -> PageWindow {
        PageWindow { skip, take }
    }

    #[test]
    fn loads_items_and_ignores_blank_lines() {
        let c = catalog();
        assert_eq!(c.items().len(), 4);
        assert!(c.skipped().is_empty());
    }

    #[test]
    fn malformed_and_duplicate_lines_are_skipped() {
        let text = "{\"id\":\"a\"}\nnot json\n{\"id\":\"a\"}\n{\"id\":\"\"}\n";
        let c = JsonlCatalog::from_reader(text.as_bytes()).expect("loads");
        assert_eq!(c.items().len(), 1);
        assert_eq!(c.skipped().len(), 3);
        assert!(matches!(
            c.skipped()[0],
            CatalogError::InvalidLine { line: 2, .. }
        ));
        assert!(matches!(
            c.skipped()[1],
            CatalogError::DuplicateId { line: 3, .. }
        ));
        assert!(matches!(
            c.skipped()[2],
            CatalogError::InvalidLine { line: 4, .. }
        ));
    }

    #[test]
    fn load_missing_file_is_file_not_found() {
        let result = JsonlCatalog::load("/nonexistent/catalog.jsonl");
        assert!(matches!(result, Err(CatalogError::FileNotFound { .. })));
    }

    #[test]
    fn pages_respect_window() {
        let mut c = catalog();
        let all = FilterSpec::all();
        let first = c.fetch_page(&all, window(0, 3)).expect("page");
        let second = c.fetch_page(&all, window(3, 3)).expect("page");
        assert_eq!(first.len(), 3);
        assert_eq!(titles(&second), vec!["Dunes"]);
        assert!(c.fetch_page(&all, window(9, 3)).expect("page").is_empty());
    }

    #[test]
    fn title_match_is_case_insensitive_substring() {
        let mut c = catalog();
        let page = c
            .fetch_page(&FilterSpec::all().with_title("HARBOUR"), window(0, 10))
            .expect("page");
        assert_eq!(titles(&page), vec!["Harbour at dusk", "Harbour crane"]);
    }

    #[test]
    fn liked_and_tags_filter() {
        let mut c = catalog();
        let liked = c
            .fetch_page(&FilterSpec::all().with_liked(true), window(0, 10))
            .expect("page");
        assert_eq!(titles(&liked), vec!["Harbour at dusk", "Dunes"]);

        let sand_road = c
            .fetch_page(
                &FilterSpec::all().with_tag("sand").with_tag("road"),
                window(0, 10),
            )
            .expect("page");
        assert_eq!(titles(&sand_road), vec!["Desert road"]);
    }

    #[test]
    fn numeric_range_excludes_missing_values() {
        let mut c = catalog();
        let mut spec = FilterSpec::all();
        spec.iso = NumericRange::new(Some(100.0), Some(800.0));
        let page = c.fetch_page(&spec, window(0, 10)).expect("page");
        assert_eq!(titles(&page), vec!["Harbour at dusk", "Desert road"]);
    }

    #[test]
    fn camera_and_date_predicates_filter() {
        let text = r#"{"id":"a","title":"Early","cameraMake":"Fujifilm","dateTaken":"2023-05-01T10:00:00Z"}
{"id":"b","title":"Late","cameraMake":"FUJIFILM","dateTaken":"2024-05-01T10:00:00Z"}
{"id":"c","title":"Undated","cameraMake":"Leica"}
"#;
        let mut c = JsonlCatalog::from_reader(text.as_bytes()).expect("valid catalog");

        let mut fuji = FilterSpec::all();
        fuji.camera_make = Some("fujifilm".to_string());
        let page = c.fetch_page(&fuji, window(0, 10)).expect("page");
        assert_eq!(titles(&page), vec!["Early", "Late"]);

        let mut recent = FilterSpec::all();
        recent.date_taken.start = "2024-01-01T00:00:00Z".parse().ok();
        let page = c.fetch_page(&recent, window(0, 10)).expect("page");
        assert_eq!(titles(&page), vec!["Late"]);
    }
}
