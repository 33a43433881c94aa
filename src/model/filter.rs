//! Filter predicates and the pagination window sent to the provider.
//!
//! A [`FilterSpec`] holds only predicates. Two specs that compare equal
//! belong to the same filter epoch; the pagination window lives in
//! [`PageWindow`] so that it can never leak into that comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive numeric range. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Lower bound.
    pub min: Option<f64>,
    /// Upper bound.
    pub max: Option<f64>,
}

impl NumericRange {
    /// Range with the given bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// True when neither bound is set, so the range matches anything.
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Date-taken window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest accepted instant.
    pub start: Option<DateTime<Utc>>,
    /// Latest accepted instant.
    pub end: Option<DateTime<Utc>>,
}

/// Circle on the globe; radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRadius {
    /// Centre latitude in degrees.
    pub latitude: f64,
    /// Centre longitude in degrees.
    pub longitude: f64,
    /// Radius in kilometres.
    pub radius: f64,
}

/// Named predicates describing which items the feed shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive title match.
    pub title: Option<String>,
    /// Only liked (or only unliked) items.
    pub liked: Option<bool>,
    /// Exact camera manufacturer, ignoring case.
    pub camera_make: Option<String>,
    /// Exact camera model, ignoring case.
    pub camera_model: Option<String>,
    /// Exact lens manufacturer, ignoring case.
    pub lens_make: Option<String>,
    /// Exact lens model, ignoring case.
    pub lens_model: Option<String>,
    /// Focal length in millimetres.
    pub focal_length: NumericRange,
    /// Aperture.
    pub f_number: NumericRange,
    /// Sensor sensitivity.
    pub iso: NumericRange,
    /// Exposure time in seconds.
    pub exposure_time: NumericRange,
    /// When the photo was taken.
    pub date_taken: DateRange,
    /// Items must carry every listed tag.
    pub tags: Vec<String>,
    /// Items taken within this circle.
    pub geo: Option<GeoRadius>,
}

impl FilterSpec {
    /// Spec with no predicates: the whole library.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder: title search. Blank queries clear the predicate.
    pub fn with_title(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        let trimmed = query.trim();
        self.title = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Builder: liked-only (favorites) flag.
    pub fn with_liked(mut self, liked: bool) -> Self {
        self.liked = Some(liked);
        self
    }

    /// Builder: require a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder: geo radius predicate.
    pub fn with_geo(mut self, geo: GeoRadius) -> Self {
        self.geo = Some(geo);
        self
    }

    /// Attach a pagination window, producing the full provider request.
    pub fn with_window(&self, window: PageWindow) -> PageQuery {
        PageQuery {
            filter: self.clone(),
            window,
        }
    }
}

/// `skip`/`take` pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Items to skip from the start of the filtered sequence.
    pub skip: usize,
    /// Maximum number of items to return.
    pub take: usize,
}

/// A filter plus its window: exactly what one page fetch asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// Predicates.
    pub filter: FilterSpec,
    /// Which slice of the filtered sequence.
    pub window: PageWindow,
}

impl PageQuery {
    /// Flatten into the provider's query-string parameters.
    ///
    /// Open predicates are omitted. Ranges become `minX`/`maxX` pairs and
    /// each tag is its own `tags` entry.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let f = &self.filter;
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut text = |key: &str, value: &Option<String>| {
            if let Some(v) = value {
                pairs.push((key.to_string(), v.clone()));
            }
        };
        text("title", &f.title);
        text("cameraMake", &f.camera_make);
        text("cameraModel", &f.camera_model);
        text("lensMake", &f.lens_make);
        text("lensModel", &f.lens_model);

        if let Some(liked) = f.liked {
            pairs.push(("liked".to_string(), liked.to_string()));
        }

        for (suffix, range) in [
            ("FocalLength", &f.focal_length),
            ("FNumber", &f.f_number),
            ("Iso", &f.iso),
            ("ExposureTime", &f.exposure_time),
        ] {
            if let Some(min) = range.min {
                pairs.push((format!("min{suffix}"), min.to_string()));
            }
            if let Some(max) = range.max {
                pairs.push((format!("max{suffix}"), max.to_string()));
            }
        }

        if let Some(start) = f.date_taken.start {
            pairs.push(("dateTakenStart".to_string(), start.to_rfc3339()));
        }
        if let Some(end) = f.date_taken.end {
            pairs.push(("dateTakenEnd".to_string(), end.to_rfc3339()));
        }

        for tag in &f.tags {
            pairs.push(("tags".to_string(), tag.clone()));
        }

        if let Some(geo) = f.geo {
            pairs.push(("latitude".to_string(), geo.latitude.to_string()));
            pairs.push(("longitude".to_string(), geo.longitude.to_string()));
            pairs.push(("radius".to_string(), geo.radius.to_string()));
        }

        pairs.push(("skip".to_string(), self.window.skip.to_string()));
        pairs.push(("take".to_string(), self.window.take.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_clears_predicate() {
        let spec = FilterSpec::all().with_title("   ");
        assert_eq!(spec.title, None);
        assert_eq!(spec, FilterSpec::all());
    }

    #[test]
    fn title_is_trimmed() {
        let spec = FilterSpec::all().with_title("  harbour ");
        assert_eq!(spec.title.as_deref(), Some("harbour"));
    }

    #[test]
    fn window_does_not_affect_spec_equality() {
        let spec = FilterSpec::all().with_liked(true);
        let first = spec.with_window(PageWindow { skip: 0, take: 24 });
        let second = spec.with_window(PageWindow { skip: 48, take: 24 });
        assert_eq!(first.filter, second.filter);
        assert_ne!(first, second);
    }

    #[test]
    fn query_pairs_omit_open_predicates() {
        let pairs = FilterSpec::all()
            .with_window(PageWindow { skip: 24, take: 24 })
            .query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("skip".to_string(), "24".to_string()),
                ("take".to_string(), "24".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_flatten_ranges_tags_and_geo() {
        let mut spec = FilterSpec::all()
            .with_title("dunes")
            .with_liked(true)
            .with_tag("desert")
            .with_tag("sand")
            .with_geo(GeoRadius {
                latitude: 31.5,
                longitude: -8.25,
                radius: 10.0,
            });
        spec.iso = NumericRange::new(Some(100.0), Some(800.0));

        let pairs = spec.with_window(PageWindow { skip: 0, take: 2 }).query_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "title", "liked", "minIso", "maxIso", "tags", "tags", "latitude", "longitude",
                "radius", "skip", "take"
            ]
        );
        assert!(pairs.contains(&("minIso".to_string(), "100".to_string())));
        assert!(pairs.contains(&("latitude".to_string(), "31.5".to_string())));
    }

    #[test]
    fn numeric_range_open_when_both_bounds_missing() {
        assert!(NumericRange::default().is_open());
        assert!(!NumericRange::new(None, Some(2.0)).is_open());
    }
}
