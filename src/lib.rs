// src/lib.rs
//! notion2tasks library: maps a graph of related Notion databases into an
//! LLM-ready schema and writes extracted tasks back.
//!
//! # Public API
//!
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `PipelineConfig`, `Stage`
//! - **Domain model**: `Database`, `PropertyKind`, `Record`, `CellValue`
//! - **API client**: `NotionRepository`, `NotionWriter`, `NotionHttpClient`, parsers
//! - **Collector**: `SchemaCollector`, `SchemaPayload`, `ReferenceSampler`, normalization
//! - **Upload**: `TaskUploader`, `build_property_payload`, `UploadOutcome`

pub mod api;
pub mod collector;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod types;
pub mod upload;

// --- Error Handling ---
pub use crate::error::{AppError, DatabaseFetchFailure, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, PipelineConfig, Stage};

// --- Domain Model ---
pub use crate::model::{
    CellValue, Database, PropertyDefinition, PropertyKind, Record, WorkspaceUser,
};

// --- Domain Types ---
pub use crate::types::{canonical_key, ApiBaseUrl, ApiKey, NotionId};

// --- API Client ---
pub use crate::api::{
    client::ApiResponse,
    parser::{parse_database_response, parse_records_pagination, parse_users_pagination},
    types::PaginatedResponse,
    NotionHttpClient, NotionRepository, NotionWriter,
};

// --- Collector ---
pub use crate::collector::{
    discover, normalize_database, CollectionReport, DatabasePool, DatabaseSchema,
    MissingDatabase, PropertyTarget, ReferenceSampler, ReferenceTable, SchemaCollector,
    SchemaPayload, SchemaProperty,
};
pub use crate::collector::schema::{resolve_relation, resolve_rollup};

// --- Upload ---
pub use crate::upload::{
    build_property_payload, read_tasks_file, PeopleDirectory, TaskRecord, TaskUploader,
    UploadOutcome, UploadStatus,
};

// --- Pipeline Traits ---
pub use crate::pipeline::{PayloadDelivery, SchemaSource, TaskSink};
