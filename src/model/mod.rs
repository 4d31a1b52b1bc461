//! Domain model: what a Notion database looks like once it has been fetched.
//!
//! These types are produced by the API adapter and never mutated afterwards.
//! Relation and rollup targets are stored by id only; resolving them against
//! other databases is the job of the collector's normalization pass.

mod record;

pub use record::{CellValue, Record, WorkspaceUser};

use crate::constants::UNTITLED_DATABASE;
use crate::types::{canonical_key, NotionId};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A fetched database descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Database {
    pub id: NotionId,
    /// Plain-text title, empty if the database has none.
    pub title: String,
    /// Property definitions keyed by property name, in API order.
    pub properties: IndexMap<String, PropertyDefinition>,
}

impl Database {
    /// Title for display; never empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_DATABASE
        } else {
            &self.title
        }
    }

    /// Reverse index from canonical property id to property name.
    pub fn property_id_index(&self) -> HashMap<String, String> {
        self.properties
            .values()
            .map(|prop| (canonical_key(&prop.id), prop.name.clone()))
            .collect()
    }

    /// Target databases of every relation property, in property order.
    pub fn relation_targets(&self) -> impl Iterator<Item = &NotionId> {
        self.properties
            .values()
            .filter_map(|prop| match &prop.kind {
                PropertyKind::Relation { database_id } => Some(database_id),
                _ => None,
            })
    }

    /// Name of the database's title property, if it has one.
    pub fn title_property(&self) -> Option<&str> {
        self.properties
            .values()
            .find(|prop| matches!(prop.kind, PropertyKind::Title))
            .map(|prop| prop.name.as_str())
    }
}

/// A single property definition from a database schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    /// Stable property id as the API spells it (may be URL-encoded).
    pub id: String,
    pub name: String,
    pub kind: PropertyKind,
}

/// Declared property types.
///
/// Only the kinds that carry configuration the collector needs hold data;
/// anything the client does not know about lands in [`PropertyKind::Other`]
/// with its raw type name.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Title,
    RichText,
    Url,
    Date,
    Number,
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String> },
    Status { options: Vec<String> },
    People,
    Relation { database_id: NotionId },
    Rollup {
        relation_property_id: String,
        rollup_property_id: String,
    },
    Checkbox,
    Email,
    PhoneNumber,
    Files,
    Formula,
    CreatedTime,
    CreatedBy,
    LastEditedTime,
    LastEditedBy,
    Other(String),
}

impl PropertyKind {
    /// The API's name for this property type.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Url => "url",
            PropertyKind::Date => "date",
            PropertyKind::Number => "number",
            PropertyKind::Select { .. } => "select",
            PropertyKind::MultiSelect { .. } => "multi_select",
            PropertyKind::Status { .. } => "status",
            PropertyKind::People => "people",
            PropertyKind::Relation { .. } => "relation",
            PropertyKind::Rollup { .. } => "rollup",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Email => "email",
            PropertyKind::PhoneNumber => "phone_number",
            PropertyKind::Files => "files",
            PropertyKind::Formula => "formula",
            PropertyKind::CreatedTime => "created_time",
            PropertyKind::CreatedBy => "created_by",
            PropertyKind::LastEditedTime => "last_edited_time",
            PropertyKind::LastEditedBy => "last_edited_by",
            PropertyKind::Other(name) => name,
        }
    }

    /// Option names declared in the schema for choice-like kinds.
    pub fn declared_options(&self) -> Option<&[String]> {
        match self {
            PropertyKind::Select { options }
            | PropertyKind::MultiSelect { options }
            | PropertyKind::Status { options } => Some(options),
            _ => None,
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(id: &str, name: &str, kind: PropertyKind) -> (String, PropertyDefinition) {
        (
            name.to_string(),
            PropertyDefinition {
                id: id.to_string(),
                name: name.to_string(),
                kind,
            },
        )
    }

    fn sample_database() -> Database {
        Database {
            id: NotionId::from_api("11111111-1111-1111-1111-111111111111"),
            title: String::new(),
            properties: IndexMap::from([
                prop("title", "Name", PropertyKind::Title),
                prop(
                    "ab-cd",
                    "Project",
                    PropertyKind::Relation {
                        database_id: NotionId::from_api("22222222222222222222222222222222"),
                    },
                ),
                prop("x%3Ay", "Kind", PropertyKind::Other("button".into())),
            ]),
        }
    }

    #[test]
    fn empty_title_displays_as_untitled() {
        assert_eq!(sample_database().display_title(), "(Untitled)");
    }

    #[test]
    fn id_index_uses_canonical_ids() {
        let index = sample_database().property_id_index();
        assert_eq!(index.get("abcd").map(String::as_str), Some("Project"));
        assert_eq!(index.get("x%3Ay").map(String::as_str), Some("Kind"));
    }

    #[test]
    fn finds_relation_targets_and_title_property() {
        let db = sample_database();
        let targets: Vec<_> = db.relation_targets().map(NotionId::as_str).collect();
        assert_eq!(targets, vec!["22222222222222222222222222222222"]);
        assert_eq!(db.title_property(), Some("Name"));
    }

    #[test]
    fn unknown_kinds_keep_their_type_name() {
        assert_eq!(PropertyKind::Other("button".into()).type_name(), "button");
        assert_eq!(PropertyKind::MultiSelect { options: vec![] }.to_string(), "multi_select");
    }
}
