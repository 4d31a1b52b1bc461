// src/pipeline.rs
//! Pipeline capability traits: one per stage, so each stage can be tested in
//! isolation and the binary only wires them together.

use crate::collector::{CollectionReport, SchemaCollector};
use crate::error::AppError;
use crate::output::OutputReport;
use crate::types::NotionId;
use crate::upload::{TaskRecord, TaskUploader, UploadOutcome};

/// Produces the schema + reference payload for a root database.
#[async_trait::async_trait]
pub trait SchemaSource {
    async fn collect_schema(&self, root: &NotionId) -> CollectionReport;
}

/// Writes extracted tasks into the workspace.
#[async_trait::async_trait]
pub trait TaskSink {
    async fn upload_tasks(&self, tasks: &[TaskRecord]) -> Result<Vec<UploadOutcome>, AppError>;
}

/// Delivers a rendered JSON document to its destination.
pub trait PayloadDelivery {
    fn deliver(&self, rendered: String) -> Result<OutputReport, AppError>;
}

#[async_trait::async_trait]
impl SchemaSource for SchemaCollector {
    async fn collect_schema(&self, root: &NotionId) -> CollectionReport {
        self.collect(root).await
    }
}

#[async_trait::async_trait]
impl<'a> TaskSink for TaskUploader<'a> {
    async fn upload_tasks(&self, tasks: &[TaskRecord]) -> Result<Vec<UploadOutcome>, AppError> {
        self.upload(tasks).await
    }
}
