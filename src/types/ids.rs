// src/types/ids.rs
//! Notion identifiers and their canonical form.
//!
//! Notion hands out the same identifier in several spellings: dashed UUIDs
//! from the API, bare 32-character hex in URLs, and URL-encoded fragments for
//! property ids. Everything that is compared or used as a map key goes through
//! [`canonical_key`] so that differently formatted spellings collide.

use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Separator stripped from identifiers before comparison.
pub const ID_SEPARATOR: char = '-';

/// Canonical comparison form of an opaque identifier: separators removed.
///
/// Used for database ids and property ids alike.
pub fn canonical_key(raw: &str) -> String {
    raw.trim().replace(ID_SEPARATOR, "")
}

/// A Notion database (or page) identifier, stored in canonical form.
///
/// Two `NotionId`s are equal when they refer to the same resource,
/// regardless of how the raw input was formatted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Parses user input: a dashed UUID, 32 hex characters, or a notion.so URL.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("notion id"));
        }

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(NotionId(uuid.as_simple().to_string()));
        }

        if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(NotionId(cleaned.to_lowercase()));
        }

        if cleaned.contains("notion") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Builds an id from a value the API returned.
    ///
    /// The API is trusted to hand back real identifiers, so only the
    /// canonical form is applied; malformed values are kept verbatim rather
    /// than rejected.
    pub fn from_api(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(id) => id,
            Err(_) => NotionId(canonical_key(raw)),
        }
    }

    /// Returns the canonical (separator-free) id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the dashed UUID form used in API paths.
    pub fn to_hyphenated(&self) -> String {
        match Uuid::parse_str(&self.0) {
            Ok(uuid) => uuid.as_hyphenated().to_string(),
            Err(_) => self.0.clone(),
        }
    }

    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(
                r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
            ).expect("Notion ID regex is a valid pattern");
        }

        ID_REGEX
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|m| NotionId(canonical_key(m.as_str()).to_lowercase()))
            .ok_or_else(|| ValidationError::InvalidId(format!("No valid ID found in URL: {}", url)))
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(NotionId::from_api(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_and_bare_forms_collide() {
        let dashed = NotionId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let bare = NotionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(dashed, bare);
        assert_eq!(bare.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn parses_database_url() {
        let id = NotionId::parse(
            "https://www.notion.so/acme/Tasks-550e8400e29b41d4a716446655440000?v=1234",
        )
        .unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn rejects_garbage() {
        assert!(NotionId::parse("too-short").is_err());
        assert!(matches!(
            NotionId::parse("   "),
            Err(ValidationError::EmptyField(_))
        ));
    }

    #[test]
    fn hyphenates_for_api_paths() {
        let id = NotionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.to_hyphenated(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn api_values_keep_their_canonical_form() {
        let id = NotionId::from_api("not-a-uuid");
        assert_eq!(id.as_str(), "notauuid");
        assert_eq!(id.to_hyphenated(), "notauuid");
    }

    #[test]
    fn canonical_key_strips_separators_only() {
        assert_eq!(canonical_key("a%3A-b-C"), "a%3AbC");
        assert_eq!(canonical_key("title"), "title");
    }
}
