//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Deserialization goes through the same smart constructors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a feed item (one photo).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Smart constructor: validates non-empty item ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidItemId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidItemId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItemId {
    type Error = InvalidItemId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Identifier of one binary resource (a photo file) served by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaId(String);

impl MediaId {
    /// Smart constructor: validates non-empty media ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidMediaId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidMediaId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MediaId {
    type Error = InvalidMediaId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<MediaId> for String {
    fn from(id: MediaId) -> Self {
        id.0
    }
}

// ===== Error Types =====

/// Rejected [`ItemId`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidItemId {
    /// The id was an empty string.
    #[error("Item ID cannot be empty")]
    Empty,
}

/// Rejected [`MediaId`] input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMediaId {
    /// The id was an empty string.
    #[error("Media ID cannot be empty")]
    Empty,
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    // ===== ItemId Tests =====

    #[test]
    fn item_id_accepts_valid_string() {
        let id = ItemId::new("0b6f3c1e-photo");
        assert!(id.is_ok(), "Valid item ID should be accepted");
    }

    #[test]
    fn item_id_rejects_empty_string() {
        let id = ItemId::new("");
        assert!(
            matches!(id, Err(InvalidItemId::Empty)),
            "Empty string should return InvalidItemId::Empty"
        );
    }

    #[test]
    fn item_id_as_str_returns_original() {
        let id = ItemId::new("photo-42").expect("Valid item ID");
        assert_eq!(id.as_str(), "photo-42");
    }

    #[test]
    fn item_id_display_returns_inner_string() {
        let id = ItemId::new("photo-42").expect("Valid item ID");
        assert_eq!(id.to_string(), "photo-42");
    }

    #[test]
    fn item_id_deserializes_through_smart_constructor() {
        let ok: Result<ItemId, _> = serde_json::from_str(r#""photo-1""#);
        assert_eq!(ok.expect("valid").as_str(), "photo-1");

        let empty: Result<ItemId, _> = serde_json::from_str(r#""""#);
        assert!(empty.is_err(), "Empty ID must fail deserialization");
    }

    // ===== MediaId Tests =====

    #[test]
    fn media_id_accepts_valid_string() {
        let id = MediaId::new("file-7");
        assert!(id.is_ok(), "Valid media ID should be accepted");
    }

    #[test]
    fn media_id_rejects_empty_string() {
        assert!(matches!(MediaId::new(""), Err(InvalidMediaId::Empty)));
    }

    #[test]
    fn media_id_serializes_as_plain_string() {
        let id = MediaId::new("file-7").expect("Valid media ID");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, r#""file-7""#);
    }
}
