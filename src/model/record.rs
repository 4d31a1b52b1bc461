// src/model/record.rs
//! Database rows and workspace users, reduced to what the collector and
//! uploader read from them.

use crate::types::NotionId;
use indexmap::IndexMap;

/// A database row (a Notion page whose parent is a database).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: NotionId,
    pub cells: IndexMap<String, CellValue>,
}

/// The value of one property on one row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Concatenated plain text of a title property.
    Title(String),
    /// Display names of the people in a people property (unnamed users omitted).
    People(Vec<String>),
    /// Ids of the related rows, as the API spells them.
    Relation(Vec<String>),
    /// Any value the collector does not sample.
    Other { kind: String },
}

/// A workspace member, used to map names and emails to user ids on upload.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    /// `false` for bots and integrations.
    pub is_person: bool,
}
