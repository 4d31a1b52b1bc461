// src/upload/mod.rs
//! Task upload: writes extracted task records into the tasks database,
//! skipping generic names and tasks that already exist.
//!
//! Each task gets exactly one [`UploadOutcome`]; only failures to read the
//! target database itself abort the stage.

pub mod properties;

pub use properties::{build_property_payload, value_text, PeopleDirectory};

use crate::api::{collect_pages, NotionWriter, PaginationStop};
use crate::constants::{BLOCKED_TASK_NAMES, TASK_NAME_FIELD, UNNAMED_TASK, UPLOAD_PACING};
use crate::error::AppError;
use crate::model::Database;
use crate::types::NotionId;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// An extracted task: property name → value.
pub type TaskRecord = Map<String, Value>;

/// Reads a JSON array of task objects, as written by the extractor.
pub fn read_tasks_file(path: &Path) -> Result<Vec<TaskRecord>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| AppError::JsonParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// What happened to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Created,
    SkippedGenericName,
    SkippedExisting,
    NoMappableFields,
    Failed(String),
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::SkippedGenericName => write!(f, "skipped (generic name)"),
            Self::SkippedExisting => write!(f, "skipped (already exists)"),
            Self::NoMappableFields => write!(f, "failed (no mappable fields)"),
            Self::Failed(message) => write!(f, "failed ({})", message),
        }
    }
}

impl Serialize for UploadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub task: String,
    pub status: UploadStatus,
}

/// Property types of the target database, resolved once per upload.
#[derive(Debug, Clone)]
struct TargetSchema {
    kinds: HashMap<String, String>,
    title_property: String,
}

impl TargetSchema {
    fn from_database(database: &Database) -> Result<Self, AppError> {
        let title_property = database
            .title_property()
            .ok_or_else(|| {
                AppError::MalformedResponse(format!(
                    "database {} has no title property",
                    database.id.to_hyphenated()
                ))
            })?
            .to_string();

        let kinds = database
            .properties
            .iter()
            .map(|(name, prop)| (name.clone(), prop.kind.type_name().to_string()))
            .collect();

        Ok(Self {
            kinds,
            title_property,
        })
    }

    fn kind_of(&self, property: &str) -> Option<&str> {
        self.kinds.get(property).map(String::as_str)
    }
}

/// Uploads task records into one database.
pub struct TaskUploader<'a> {
    writer: &'a dyn NotionWriter,
    database: NotionId,
    pacing: Duration,
}

impl<'a> TaskUploader<'a> {
    pub fn new(writer: &'a dyn NotionWriter, database: NotionId) -> Self {
        Self {
            writer,
            database,
            pacing: UPLOAD_PACING,
        }
    }

    /// Pause after each page creation attempt.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub async fn upload(&self, tasks: &[TaskRecord]) -> Result<Vec<UploadOutcome>, AppError> {
        let database = self.writer.retrieve_database(&self.database).await?;
        let schema = TargetSchema::from_database(&database)?;
        let people = self.load_people().await;

        log::info!(
            "Uploading {} task(s) into '{}' (title property '{}')",
            tasks.len(),
            database.display_title(),
            schema.title_property
        );

        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            let outcome = self.upload_one(task, &schema, &people).await;
            log::debug!("{}: {}", outcome.task, outcome.status);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn load_people(&self) -> PeopleDirectory {
        let result = collect_pages(
            |page_size, cursor| self.writer.list_users(page_size, cursor),
            None,
        )
        .await;

        if let PaginationStop::Interrupted { cause } = &result.stop {
            log::warn!("User listing stopped early, people may not map: {}", cause);
        }

        let directory: PeopleDirectory = result.items.iter().collect();
        log::debug!("People directory has {} key(s)", directory.len());
        directory
    }

    async fn upload_one(
        &self,
        task: &TaskRecord,
        schema: &TargetSchema,
        people: &PeopleDirectory,
    ) -> UploadOutcome {
        let name = task
            .get(TASK_NAME_FIELD)
            .filter(|v| !v.is_null())
            .map(value_text)
            .unwrap_or_default();
        let label = if name.is_empty() {
            UNNAMED_TASK.to_string()
        } else {
            name.clone()
        };

        if BLOCKED_TASK_NAMES.contains(&name.trim()) {
            return UploadOutcome {
                task: label,
                status: UploadStatus::SkippedGenericName,
            };
        }

        if self.already_exists(schema, &name).await {
            return UploadOutcome {
                task: name,
                status: UploadStatus::SkippedExisting,
            };
        }

        let properties: Map<String, Value> = task
            .iter()
            .filter_map(|(field, value)| {
                let kind = schema.kind_of(field)?;
                build_property_payload(kind, value, people).map(|payload| (field.clone(), payload))
            })
            .collect();

        if properties.is_empty() {
            return UploadOutcome {
                task: label,
                status: UploadStatus::NoMappableFields,
            };
        }

        let status = match self.writer.create_page(&self.database, properties).await {
            Ok(()) => UploadStatus::Created,
            Err(AppError::NotionService { message, .. }) => UploadStatus::Failed(message),
            Err(e) => UploadStatus::Failed(e.to_string()),
        };

        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }

        UploadOutcome { task: name, status }
    }

    /// Lookup failures count as "does not exist".
    async fn already_exists(&self, schema: &TargetSchema, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        match self
            .writer
            .title_exists(&self.database, &schema.title_property, name)
            .await
        {
            Ok(exists) => exists,
            Err(e) => {
                log::debug!("Duplicate check for '{}' failed: {}", name, e);
                false
            }
        }
    }
}
