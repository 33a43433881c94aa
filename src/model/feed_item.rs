//! Feed items as delivered by the paged list provider.
//!
//! Items are immutable once received. The JSON shape follows the provider's
//! camelCase convention; unknown fields are ignored so provider-side additions
//! never break the feed.

use super::identifiers::{ItemId, MediaId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Resolution variant of a binary resource.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Resolution {
    /// Full-size upload.
    #[serde(rename = "original")]
    Original,
    /// Re-encoded to fit 4K.
    #[serde(rename = "4k")]
    Compressed4k,
    /// Re-encoded to fit 1080p.
    #[serde(rename = "1080p")]
    Compressed1080p,
    /// Small thumbnail.
    #[default]
    #[serde(rename = "preview")]
    Preview,
}

impl Resolution {
    /// All variants, largest first.
    pub const ALL: [Resolution; 4] = [
        Resolution::Original,
        Resolution::Compressed4k,
        Resolution::Compressed1080p,
        Resolution::Preview,
    ];

    /// Wire name used by the provider's resource endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Original => "original",
            Resolution::Compressed4k => "4k",
            Resolution::Compressed1080p => "1080p",
            Resolution::Preview => "preview",
        }
    }

    /// Parse a wire name. Returns `None` for unknown names.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == raw)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one displayable binary resource of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    /// Resource identity.
    pub id: MediaId,
    /// Pixel width, when the provider knows it.
    #[serde(default, rename = "imageWidth")]
    pub width: Option<u32>,
    /// Pixel height, when the provider knows it.
    #[serde(default, rename = "imageHeight")]
    pub height: Option<u32>,
    /// Variants the provider can serve. Empty means every variant.
    #[serde(default, rename = "resolutions")]
    pub variants: Vec<Resolution>,
}

impl MediaRef {
    /// Create a media reference with no known dimensions.
    pub fn new(id: MediaId) -> Self {
        Self {
            id,
            width: None,
            height: None,
            variants: Vec::new(),
        }
    }

    /// Builder: set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Builder: restrict the served variants.
    pub fn with_variants(mut self, variants: impl IntoIterator<Item = Resolution>) -> Self {
        self.variants = variants.into_iter().collect();
        self
    }

    /// `width / height` when both dimensions are known and non-zero.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        }
    }

    /// Whether the provider serves `resolution` for this media.
    pub fn supports(&self, resolution: Resolution) -> bool {
        self.variants.is_empty() || self.variants.contains(&resolution)
    }

    /// Pick the variant to request: the preferred one when served, otherwise
    /// the smallest variant the provider lists.
    pub fn variant_for(&self, preferred: Resolution) -> Resolution {
        if self.supports(preferred) {
            return preferred;
        }
        self.variants.iter().copied().max().unwrap_or(preferred)
    }
}

/// Camera settings recorded with a photo. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSettings {
    /// Aperture as an f-number.
    #[serde(default)]
    pub f_number: Option<f64>,
    /// Exposure time in seconds.
    #[serde(default)]
    pub exposure_time: Option<f64>,
    /// Sensor sensitivity.
    #[serde(default)]
    pub iso: Option<u32>,
    /// Focal length in millimetres.
    #[serde(default)]
    pub focal_length: Option<f64>,
    /// Camera manufacturer.
    #[serde(default)]
    pub camera_make: Option<String>,
    /// Camera model.
    #[serde(default)]
    pub camera_model: Option<String>,
    /// Lens manufacturer.
    #[serde(default)]
    pub lens_make: Option<String>,
    /// Lens model.
    #[serde(default)]
    pub lens_model: Option<String>,
}

/// One entry of the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Unique within one filter epoch.
    pub id: ItemId,
    /// Display title; may be empty.
    #[serde(default)]
    pub title: String,
    /// Free-form caption.
    #[serde(default)]
    pub description: Option<String>,
    /// Marked as a favourite.
    #[serde(default)]
    pub liked: bool,
    /// Displayable resources; the first one is shown on the tile.
    #[serde(default, rename = "files")]
    pub media: Vec<MediaRef>,
    /// Tag labels.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// When the photo was taken.
    #[serde(default)]
    pub date_taken: Option<DateTime<Utc>>,
    /// Camera settings, flattened into the item JSON.
    #[serde(flatten)]
    pub capture: CaptureSettings,
}

impl FeedItem {
    /// Create an item with a title and no media.
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            liked: false,
            media: Vec::new(),
            tags: BTreeSet::new(),
            date_taken: None,
            capture: CaptureSettings::default(),
        }
    }

    /// Builder: append a media reference.
    pub fn with_media(mut self, media: MediaRef) -> Self {
        self.media.push(media);
        self
    }

    /// Builder: add a tag label.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder: mark as liked.
    pub fn with_liked(mut self, liked: bool) -> Self {
        self.liked = liked;
        self
    }

    /// The media reference a tile displays: the first one.
    pub fn primary_media(&self) -> Option<&MediaRef> {
        self.media.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str) -> MediaRef {
        MediaRef::new(MediaId::new(id).expect("valid media id"))
    }

    #[test]
    fn aspect_ratio_requires_both_dimensions() {
        assert_eq!(media("m").aspect_ratio(), None);
        let mut partial = media("m");
        partial.width = Some(300);
        assert_eq!(partial.aspect_ratio(), None);
        assert_eq!(media("m").with_dimensions(400, 200).aspect_ratio(), Some(2.0));
    }

    #[test]
    fn aspect_ratio_ignores_zero_dimensions() {
        assert_eq!(media("m").with_dimensions(0, 200).aspect_ratio(), None);
        assert_eq!(media("m").with_dimensions(200, 0).aspect_ratio(), None);
    }

    #[test]
    fn variant_for_prefers_requested_when_served() {
        let m = media("m").with_variants([Resolution::Original, Resolution::Preview]);
        assert_eq!(m.variant_for(Resolution::Preview), Resolution::Preview);
    }

    #[test]
    fn variant_for_falls_back_to_smallest_listed() {
        let m = media("m").with_variants([Resolution::Original, Resolution::Compressed1080p]);
        assert_eq!(
            m.variant_for(Resolution::Preview),
            Resolution::Compressed1080p
        );
    }

    #[test]
    fn variant_for_with_no_listed_variants_uses_preferred() {
        assert_eq!(
            media("m").variant_for(Resolution::Compressed4k),
            Resolution::Compressed4k
        );
    }

    #[test]
    fn resolution_defaults_to_preview() {
        assert_eq!(Resolution::default(), Resolution::Preview);
    }

    #[test]
    fn resolution_wire_names_round_trip() {
        for r in Resolution::ALL {
            assert_eq!(Resolution::parse(r.as_str()), Some(r));
        }
        assert_eq!(Resolution::parse("8k"), None);
    }

    #[test]
    fn deserializes_provider_json() {
        let json = r#"{
            "id": "p1",
            "title": "Harbour",
            "liked": true,
            "fNumber": 8,
            "exposureTime": 0.002,
            "iso": 100,
            "dateTaken": "2024-06-01T18:30:00Z",
            "files": [
                {"id": "f1", "imageWidth": 6000, "imageHeight": 4000, "resolutions": ["preview", "original"]}
            ],
            "tags": ["sea", "boats"],
            "userId": "ignored"
        }"#;

        let item: FeedItem = serde_json::from_str(json).expect("valid item");
        assert_eq!(item.id.as_str(), "p1");
        assert!(item.liked);
        assert_eq!(item.capture.f_number, Some(8.0));
        assert_eq!(item.capture.iso, Some(100));
        assert_eq!(item.primary_media().and_then(MediaRef::aspect_ratio), Some(1.5));
        assert!(item.tags.contains("boats"));
        assert!(item.date_taken.is_some());
    }

    #[test]
    fn deserializes_minimal_item() {
        let item: FeedItem = serde_json::from_str(r#"{"id":"p2"}"#).expect("valid item");
        assert!(item.media.is_empty());
        assert!(item.primary_media().is_none());
        assert!(item.title.is_empty());
    }
}
