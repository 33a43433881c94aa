//! End-to-end scenarios: a JSONL catalog and a resource directory driven
//! through a gallery session.

use gallery_feed::feed::{Intersection, PageSize};
use gallery_feed::gallery::{text, GalleryBody, GalleryOptions, GallerySession};
use gallery_feed::model::{FilterSpec, ItemId};
use gallery_feed::source::{DirectoryResources, JsonlCatalog};
use gallery_feed::tile::{LocalHandleStore, TileState};
use std::fs;
use std::path::PathBuf;

const CATALOG: &str = r#"{"id":"a","title":"Harbour","liked":true,"files":[{"id":"a-file","imageWidth":3000,"imageHeight":2000}]}
{"id":"b","title":"Tower","files":[{"id":"b-file","imageWidth":2000,"imageHeight":3000}]}
{"id":"c","title":"Unknown size","files":[{"id":"c-file"}]}
{"id":"d","title":"Square","liked":true,"files":[{"id":"d-file","imageWidth":1000,"imageHeight":1000}]}
{"id":"e","title":"Panorama","files":[{"id":"e-file","imageWidth":2000,"imageHeight":1000}]}
"#;

fn resource_dir(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("preview")).expect("create resource dir");
    for id in ["a-file", "b-file", "c-file", "d-file"] {
        fs::write(root.join("preview").join(id), id.as_bytes()).expect("write resource");
    }
    root
}

fn session(page_size: usize) -> GallerySession<LocalHandleStore> {
    let options = GalleryOptions {
        page_size: PageSize::new(page_size).expect("non-zero page size"),
        ..GalleryOptions::default()
    };
    GallerySession::new(options, LocalHandleStore::new())
}

#[test]
fn scrolling_to_the_end_lays_out_every_page() {
    let root = resource_dir("gallery_feed_scenario_scroll");
    let mut catalog = JsonlCatalog::from_reader(CATALOG.as_bytes()).expect("valid catalog");
    let mut resources = DirectoryResources::new(&root);
    let mut s = session(2);
    s.on_viewport_resize(700);

    let effects = s.on_filter_change(FilterSpec::all());
    s.drive(effects, &mut catalog, &mut resources);
    while let Some(anchor) = s.anchor() {
        let effects = s.on_anchor_observed(anchor, Intersection::visible());
        s.drive(effects, &mut catalog, &mut resources);
    }
    let _ = fs::remove_dir_all(&root);

    insta::assert_snapshot!(text::render(&s.snapshot()).trim_end(), @r"
    [0] 2.67 | a, c, e
    [1] 2.50 | b, d
    5 items, exhausted
    ");

    let e = ItemId::new("e").expect("valid item id");
    assert_eq!(s.tile(&e).map(|t| t.state()), Some(TileState::NoImage));
    assert_eq!(s.store().live_count(), 4);

    s.teardown();
    assert_eq!(s.store().acquired(), s.store().released());
}

#[test]
fn page_size_two_scenario_stops_after_short_page() {
    let mut catalog = JsonlCatalog::from_reader(CATALOG.as_bytes()).expect("valid catalog");
    let mut resources = DirectoryResources::new("/nonexistent/gallery-feed");
    let mut s = session(2);

    let effects = s.on_filter_change(FilterSpec::all().with_title("a"));
    let report = s.drive(effects, &mut catalog, &mut resources);
    assert_eq!(report.pages, 1);
    assert_eq!(report.resources, 2, "Missing resources still get requested");

    let anchor = s.anchor().expect("full page renders anchor");
    let effects = s.on_anchor_observed(anchor, Intersection::visible());
    s.drive(effects, &mut catalog, &mut resources);

    let ids: Vec<&str> = s.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d", "e"]);
    let snap = s.snapshot();
    assert!(!snap.has_more);
    assert!(snap.anchor.is_none());
    assert!(snap.error.is_none(), "Tile failures never reach the feed");
}

#[test]
fn changing_filter_mid_scroll_restarts_feed() {
    let mut catalog = JsonlCatalog::from_reader(CATALOG.as_bytes()).expect("valid catalog");
    let mut resources = DirectoryResources::new("/nonexistent/gallery-feed");
    let mut s = session(2);

    let effects = s.on_filter_change(FilterSpec::all());
    s.drive(effects, &mut catalog, &mut resources);
    let first_epoch = s.feed().epoch;

    let anchor = s.anchor().expect("anchor");
    let pending = s.on_anchor_observed(anchor, Intersection::visible());
    let liked = s.on_filter_change(FilterSpec::all().with_liked(true));

    // The page requested under the old filter settles after the change.
    let report = s.drive(pending, &mut catalog, &mut resources);
    assert_eq!(report.resources, 0, "Stale page mounts nothing");
    assert!(s.items().is_empty());

    s.drive(liked, &mut catalog, &mut resources);
    let ids: Vec<&str> = s.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d"]);
    assert_ne!(s.feed().epoch, first_epoch);
}

#[test]
fn filter_matching_nothing_shows_empty_body() {
    let mut catalog = JsonlCatalog::from_reader(CATALOG.as_bytes()).expect("valid catalog");
    let mut resources = DirectoryResources::new("/nonexistent/gallery-feed");
    let mut s = session(2);

    let effects = s.on_filter_change(FilterSpec::all().with_tag("nowhere"));
    s.drive(effects, &mut catalog, &mut resources);

    assert_eq!(s.snapshot().body, GalleryBody::Empty);
    assert_eq!(text::render(&s.snapshot()), "No photos match this filter.\n0 items, exhausted\n");
}
