// src/collector/payload.rs
//! The collector's output: the payload handed downstream plus diagnostics.

use super::pool::MissingDatabase;
use super::reference::ReferenceTable;
use super::schema::DatabaseSchema;
use crate::error::AppError;
use indexmap::IndexMap;
use serde::Serialize;

/// `{"schema": {...}, "reference": {...}}`, both keyed by canonical
/// database id in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaPayload {
    pub schema: IndexMap<String, DatabaseSchema>,
    pub reference: IndexMap<String, ReferenceTable>,
}

impl SchemaPayload {
    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn database_count(&self) -> usize {
        self.schema.len()
    }
}

/// Everything one collection run produced.
#[derive(Debug, Clone, Default)]
pub struct CollectionReport {
    pub payload: SchemaPayload,
    /// Databases that were referenced but could not be read, sorted by id.
    pub missing: Vec<MissingDatabase>,
}

impl CollectionReport {
    /// One line per missing database; never part of the payload.
    pub fn access_warnings(&self) -> Vec<String> {
        self.missing.iter().map(MissingDatabase::access_warning).collect()
    }
}
