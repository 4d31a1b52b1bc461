// src/api/responses.rs
//! Wire shapes of the Notion API responses the client reads.
//!
//! Property schemas and property values are kept loosely typed (`type` plus
//! the remaining fields) so that a property kind this client has never heard
//! of still deserializes. The adapter turns these into the domain model.

use serde::Deserialize;
use serde_json::{Map, Value};

pub use notion_client::objects::error::Error as NotionError;

/// `GET /databases/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseResponse {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichTextFragment>,
    #[serde(default)]
    pub properties: indexmap::IndexMap<String, PropertySchemaResponse>,
}

/// Only the plain text of rich text matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct RichTextFragment {
    #[serde(default)]
    pub plain_text: String,
}

/// One entry of a database's `properties` object.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySchemaResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    /// Everything else, including the type-specific configuration object.
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl PropertySchemaResponse {
    /// The type-specific configuration object (e.g. `"select": {...}`).
    pub fn type_config(&self) -> Option<&Value> {
        self.config.get(&self.kind)
    }
}

/// `select` / `multi_select` / `status` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionsConfig {
    #[serde(default)]
    pub options: Vec<NamedOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedOption {
    pub name: String,
}

/// `relation` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationConfig {
    pub database_id: String,
}

/// `rollup` configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RollupConfig {
    #[serde(default)]
    pub relation_property_id: String,
    #[serde(default)]
    pub rollup_property_id: String,
}

/// A row returned by `POST /databases/{id}/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse {
    pub id: String,
    #[serde(default)]
    pub properties: indexmap::IndexMap<String, PropertyValueResponse>,
}

/// One property value on a row.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyValueResponse {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub value: Map<String, Value>,
}

impl PropertyValueResponse {
    pub fn type_value(&self) -> Option<&Value> {
        self.value.get(&self.kind)
    }
}

/// Element of a `people` value or of the users list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub person: Option<PersonDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonDetails {
    #[serde(default)]
    pub email: Option<String>,
}

/// Element of a `relation` value.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationItem {
    #[serde(default)]
    pub id: Option<String>,
}
