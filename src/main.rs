//! Gallery Feed - Entry Point
//!
//! Loads a JSONL catalog, applies a filter, simulates scrolling to the end
//! of the grid a number of times and prints the resulting column layout.

use clap::Parser;
use gallery_feed::feed::{Intersection, PageSize};
use gallery_feed::gallery::{text, GalleryOptions, GallerySession};
use gallery_feed::model::{AppError, FilterSpec, MediaId, Resolution, TransportError};
use gallery_feed::source::{DirectoryResources, JsonlCatalog, ResourceProvider};
use gallery_feed::tile::LocalHandleStore;
use std::path::PathBuf;
use tracing::info;

/// Gallery Feed - paginated photo feed with column layout
#[derive(Parser, Debug)]
#[command(name = "gallery-feed")]
#[command(version)]
#[command(about = "Page through a photo catalog and print its column layout")]
pub struct Args {
    /// Path to JSONL catalog of feed items
    pub catalog: PathBuf,

    /// Only items whose title contains this text
    #[arg(long)]
    pub title: Option<String>,

    /// Only liked items
    #[arg(long)]
    pub liked: bool,

    /// Only items carrying this tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Viewport width in pixels
    #[arg(short, long, default_value = "1280")]
    pub width: u32,

    /// Number of times the end of the grid scrolls into view
    #[arg(short, long, default_value = "0")]
    pub scrolls: usize,

    /// Items per page
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<PageSize>,

    /// Preferred resource variant
    #[arg(long, value_parser = parse_resolution)]
    pub resolution: Option<Resolution>,

    /// Directory holding tile resources
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_page_size(raw: &str) -> Result<PageSize, String> {
    let size: usize = raw.parse().map_err(|e| format!("{e}"))?;
    PageSize::new(size).map_err(|e| e.to_string())
}

fn parse_resolution(raw: &str) -> Result<Resolution, String> {
    Resolution::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = Resolution::ALL.iter().map(Resolution::as_str).collect();
        format!("expected one of {}", known.join(", "))
    })
}

impl Args {
    fn filter(&self) -> FilterSpec {
        let mut spec = FilterSpec::all();
        if let Some(title) = &self.title {
            spec = spec.with_title(title);
        }
        if self.liked {
            spec = spec.with_liked(true);
        }
        for tag in &self.tags {
            spec = spec.with_tag(tag);
        }
        spec
    }
}

/// Resource source selected on the command line.
enum Resources {
    Directory(DirectoryResources),
    Unavailable,
}

impl ResourceProvider for Resources {
    fn fetch_resource(
        &mut self,
        media: &MediaId,
        resolution: Resolution,
    ) -> Result<Vec<u8>, TransportError> {
        match self {
            Resources::Directory(dir) => dir.fetch_resource(media, resolution),
            Resources::Unavailable => Err(TransportError::NotFound(format!(
                "{media} (no resource directory)"
            ))),
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = gallery_feed::config::load_config_with_precedence(args.config.clone())?;
        let merged = gallery_feed::config::merge_config(config_file)?;
        let with_env = gallery_feed::config::apply_env_overrides(merged)?;
        gallery_feed::config::apply_cli_overrides(with_env, args.page_size, args.resolution)
    };

    gallery_feed::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let mut catalog = JsonlCatalog::load(&args.catalog)?;
    if !catalog.skipped().is_empty() {
        eprintln!(
            "warning: skipped {} catalog line(s); see log for details",
            catalog.skipped().len()
        );
    }

    let mut resources = match &args.resources {
        Some(dir) => Resources::Directory(DirectoryResources::new(dir)),
        None => Resources::Unavailable,
    };

    let mut session = GallerySession::new(GalleryOptions::from(&config), LocalHandleStore::new());
    session.on_viewport_resize(args.width);

    let effects = session.on_filter_change(args.filter());
    session.drive(effects, &mut catalog, &mut resources);

    for _ in 0..args.scrolls {
        let Some(anchor) = session.anchor() else {
            break;
        };
        let effects = session.on_anchor_observed(anchor, Intersection::visible());
        session.drive(effects, &mut catalog, &mut resources);
    }

    print!("{}", text::render(&session.snapshot()));
    println!(
        "{} of {} tile resources loaded",
        session.store().live_count(),
        session.items().len()
    );

    session.teardown();
    Ok(())
}
