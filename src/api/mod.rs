// src/api/mod.rs
//! Notion API interaction: reading database schemas and rows, and writing
//! task pages back.
//!
//! Business logic depends on the traits below, never on HTTP details, so the
//! collector and uploader can be driven by an in-memory repository in tests.

mod adapter;
pub mod client;
pub mod pagination;
pub mod parser;
mod responses;
pub mod types;

use crate::error::AppError;
use crate::model::{Database, Record, WorkspaceUser};
use crate::types::NotionId;
use serde_json::{Map, Value};
use types::PaginatedResponse;

/// The ability to read database schemas and rows from a Notion workspace.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Fetches a database descriptor by id.
    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError>;

    /// Fetches one page of a database's rows.
    async fn query_records(
        &self,
        database: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Record>, AppError>;
}

/// The ability to create task pages in a database.
#[async_trait::async_trait]
pub trait NotionWriter: NotionRepository {
    /// Fetches one page of workspace users.
    async fn list_users(
        &self,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<WorkspaceUser>, AppError>;

    /// Whether a row whose title equals `title` already exists.
    async fn title_exists(
        &self,
        database: &NotionId,
        title_property: &str,
        title: &str,
    ) -> Result<bool, AppError>;

    /// Creates a row with the given property payloads.
    async fn create_page(
        &self,
        database: &NotionId,
        properties: Map<String, Value>,
    ) -> Result<(), AppError>;
}

pub use client::{ApiResponse, NotionHttpClient};
pub use pagination::collect_pages;
pub use types::{PaginationResult, PaginationStop};
