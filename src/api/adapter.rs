// src/api/adapter.rs
//! Adapter layer converting wire responses into the domain model.
//!
//! Conversion is forgiving: a property whose configuration cannot be read is
//! logged and downgraded to [`PropertyKind::Other`] rather than failing the
//! whole database.

use super::responses::{
    DatabaseResponse, NamedOption, OptionsConfig, PageResponse, PropertySchemaResponse,
    PropertyValueResponse, RelationConfig, RelationItem, RichTextFragment, RollupConfig,
    UserResponse,
};
use crate::error::AppError;
use crate::model::{CellValue, Database, PropertyDefinition, PropertyKind, Record, WorkspaceUser};
use crate::types::NotionId;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Convert a database response to our domain `Database`.
pub fn convert_database(response: DatabaseResponse) -> Result<Database, AppError> {
    if response.id.trim().is_empty() {
        return Err(AppError::MalformedResponse(
            "Database missing required ID field".to_string(),
        ));
    }

    let properties = response
        .properties
        .into_iter()
        .map(|(name, schema)| {
            let definition = convert_property_schema(&name, schema);
            (name, definition)
        })
        .collect();

    Ok(Database {
        id: NotionId::from_api(&response.id),
        title: join_plain_text(&response.title),
        properties,
    })
}

/// Convert a queried row to a `Record`.
pub fn convert_record(response: PageResponse) -> Result<Record, AppError> {
    let cells = response
        .properties
        .into_iter()
        .map(|(name, value)| {
            let cell = convert_cell(&name, value);
            (name, cell)
        })
        .collect();

    Ok(Record {
        id: NotionId::from_api(&response.id),
        cells,
    })
}

/// Convert a user object from the users list.
pub fn convert_user(response: UserResponse) -> Result<WorkspaceUser, AppError> {
    Ok(WorkspaceUser {
        is_person: response.kind.as_deref() == Some("person"),
        email: response.person.and_then(|person| person.email),
        name: response.name,
        id: response.id,
    })
}

fn join_plain_text(fragments: &[RichTextFragment]) -> String {
    fragments.iter().map(|f| f.plain_text.as_str()).collect()
}

/// Reads the type-specific configuration object, if it parses.
fn read_config<T: DeserializeOwned>(name: &str, config: Option<&Value>) -> Option<T> {
    let value = config?.clone();
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("Unreadable configuration for property '{}': {}", name, e);
            None
        }
    }
}

fn option_names(options: Vec<NamedOption>) -> Vec<String> {
    options.into_iter().map(|opt| opt.name).collect()
}

/// Convert individual property schema with graceful fallback.
fn convert_property_schema(name: &str, schema: PropertySchemaResponse) -> PropertyDefinition {
    let config = schema.type_config();

    let kind = match schema.kind.as_str() {
        "title" => PropertyKind::Title,
        "rich_text" => PropertyKind::RichText,
        "url" => PropertyKind::Url,
        "date" => PropertyKind::Date,
        "number" => PropertyKind::Number,
        "select" | "multi_select" | "status" => {
            let options = read_config::<OptionsConfig>(name, config)
                .map(|c| option_names(c.options))
                .unwrap_or_default();
            match schema.kind.as_str() {
                "select" => PropertyKind::Select { options },
                "multi_select" => PropertyKind::MultiSelect { options },
                _ => PropertyKind::Status { options },
            }
        }
        "people" => PropertyKind::People,
        "relation" => match read_config::<RelationConfig>(name, config) {
            Some(relation) => PropertyKind::Relation {
                database_id: NotionId::from_api(&relation.database_id),
            },
            None => PropertyKind::Other(schema.kind.clone()),
        },
        "rollup" => match read_config::<RollupConfig>(name, config) {
            Some(rollup) => PropertyKind::Rollup {
                relation_property_id: rollup.relation_property_id,
                rollup_property_id: rollup.rollup_property_id,
            },
            None => PropertyKind::Other(schema.kind.clone()),
        },
        "checkbox" => PropertyKind::Checkbox,
        "email" => PropertyKind::Email,
        "phone_number" => PropertyKind::PhoneNumber,
        "files" => PropertyKind::Files,
        "formula" => PropertyKind::Formula,
        "created_time" => PropertyKind::CreatedTime,
        "created_by" => PropertyKind::CreatedBy,
        "last_edited_time" => PropertyKind::LastEditedTime,
        "last_edited_by" => PropertyKind::LastEditedBy,
        other => {
            log::debug!("Property '{}' has unrecognised type '{}'", name, other);
            PropertyKind::Other(other.to_string())
        }
    };

    PropertyDefinition {
        id: schema.id,
        name: schema.name.unwrap_or_else(|| name.to_string()),
        kind,
    }
}

/// Convert a row's property value, keeping only what sampling reads.
fn convert_cell(name: &str, value: PropertyValueResponse) -> CellValue {
    let raw = value.type_value();

    match value.kind.as_str() {
        "title" => {
            let fragments: Vec<RichTextFragment> = read_config(name, raw).unwrap_or_default();
            CellValue::Title(join_plain_text(&fragments))
        }
        "people" => {
            let people: Vec<UserResponse> = read_config(name, raw).unwrap_or_default();
            CellValue::People(
                people
                    .into_iter()
                    .filter_map(|user| user.name.filter(|n| !n.is_empty()))
                    .collect(),
            )
        }
        "relation" => {
            let related: Vec<RelationItem> = read_config(name, raw).unwrap_or_default();
            CellValue::Relation(
                related
                    .into_iter()
                    .filter_map(|item| item.id.filter(|id| !id.is_empty()))
                    .collect(),
            )
        }
        _ => CellValue::Other {
            kind: value.kind.clone(),
        },
    }
}
