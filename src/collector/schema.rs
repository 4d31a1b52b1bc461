// src/collector/schema.rs
//! Normalization: flattens each database's property definitions into the
//! shape handed to the extractor, resolving relation and rollup targets
//! against the pool.
//!
//! This is a pure pass over a finished pool. Anything that cannot be
//! resolved carries [`UNRESOLVED_MARKER`] instead of failing.

use super::pool::DatabasePool;
use crate::constants::UNRESOLVED_MARKER;
use crate::model::{Database, PropertyKind};
use crate::types::{canonical_key, NotionId};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// Normalized schema of one database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseSchema {
    pub id: String,
    pub title: String,
    pub properties: IndexMap<String, SchemaProperty>,
}

/// One normalized property: its declared type plus, for relations and
/// rollups, where it points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub target: Option<PropertyTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyTarget {
    Relation(RelationTarget),
    Rollup(RollupTarget),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationTarget {
    pub related_database_id: String,
    pub related_database_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupTarget {
    pub relation_property_id: String,
    pub relation_property_name: String,
    pub rollup_property_id: String,
    pub rollup_property_name: String,
    pub related_database_id: String,
    pub related_database_title: String,
}

impl RollupTarget {
    /// True when both hops resolved.
    pub fn is_resolved(&self) -> bool {
        self.rollup_property_name != UNRESOLVED_MARKER
            && self.related_database_title != UNRESOLVED_MARKER
    }
}

/// Normalizes one database against the pool.
pub fn normalize_database(database: &Database, pool: &DatabasePool) -> DatabaseSchema {
    let local_index = database.property_id_index();

    let properties = database
        .properties
        .iter()
        .map(|(name, prop)| {
            let target = match &prop.kind {
                PropertyKind::Relation { database_id } => {
                    Some(PropertyTarget::Relation(resolve_relation(database_id, pool)))
                }
                PropertyKind::Rollup {
                    relation_property_id,
                    rollup_property_id,
                } => Some(PropertyTarget::Rollup(resolve_rollup(
                    database,
                    &local_index,
                    relation_property_id,
                    rollup_property_id,
                    pool,
                ))),
                _ => None,
            };

            let normalized = SchemaProperty {
                kind: prop.kind.type_name().to_string(),
                target,
            };
            (name.clone(), normalized)
        })
        .collect();

    DatabaseSchema {
        id: database.id.to_hyphenated(),
        title: database.display_title().to_string(),
        properties,
    }
}

/// Attaches the target database's title, if it was fetched.
pub fn resolve_relation(target: &NotionId, pool: &DatabasePool) -> RelationTarget {
    RelationTarget {
        related_database_id: target.to_hyphenated(),
        related_database_title: pool
            .get(target)
            .map(|db| db.display_title().to_string())
            .unwrap_or_else(|| UNRESOLVED_MARKER.to_string()),
    }
}

/// Resolves a rollup in two hops: local relation property → target database,
/// then the aggregated property id → its name on that database.
pub fn resolve_rollup(
    database: &Database,
    local_index: &HashMap<String, String>,
    relation_property_id: &str,
    rollup_property_id: &str,
    pool: &DatabasePool,
) -> RollupTarget {
    let unresolved = || UNRESOLVED_MARKER.to_string();

    let relation_name = local_index.get(&canonical_key(relation_property_id)).cloned();

    let target_id = relation_name
        .as_ref()
        .and_then(|name| database.properties.get(name))
        .and_then(|prop| match &prop.kind {
            PropertyKind::Relation { database_id } => Some(database_id),
            _ => None,
        });

    let target_db = target_id.and_then(|id| pool.get(id));

    let rollup_name = target_db.and_then(|db| {
        db.property_id_index()
            .get(&canonical_key(rollup_property_id))
            .cloned()
    });

    if target_db.is_none() {
        log::debug!(
            "Rollup through '{}' in '{}' has no reachable target database",
            relation_property_id,
            database.display_title()
        );
    }

    RollupTarget {
        relation_property_id: relation_property_id.to_string(),
        relation_property_name: relation_name.unwrap_or_else(unresolved),
        rollup_property_id: rollup_property_id.to_string(),
        rollup_property_name: rollup_name.unwrap_or_else(unresolved),
        related_database_id: target_id
            .map(NotionId::to_hyphenated)
            .unwrap_or_else(unresolved),
        related_database_title: target_db
            .map(|db| db.display_title().to_string())
            .unwrap_or_else(unresolved),
    }
}
