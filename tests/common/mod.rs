// tests/common/mod.rs
//! In-memory Notion workspace for integration tests.
//!
//! Databases, rows and users are served from fixtures or built in code.
//! Every call is recorded so tests can inspect what the client asked for.

#![allow(dead_code)]

use notion2tasks::{
    parse_database_response, parse_records_pagination, parse_users_pagination, ApiResponse,
    AppError, Database, NotionErrorCode, NotionId, NotionRepository, NotionWriter,
    PaginatedResponse, Record, WorkspaceUser,
};
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const TASKS_DB: &str = "a1b2c3d4-0000-4000-8000-000000000001";
pub const PROJECTS_DB: &str = "a1b2c3d4-0000-4000-8000-000000000002";
pub const CLIENTS_DB: &str = "a1b2c3d4-0000-4000-8000-000000000004";

pub const DATABASE_TASKS: &str = include_str!("../fixtures/api_responses/database_tasks.json");
pub const DATABASE_PROJECTS: &str =
    include_str!("../fixtures/api_responses/database_projects.json");
pub const ERROR_NOT_FOUND: &str =
    include_str!("../fixtures/api_responses/error_object_not_found.json");
pub const QUERY_TASKS: &str = include_str!("../fixtures/api_responses/query_tasks.json");
pub const USERS: &str = include_str!("../fixtures/api_responses/users.json");

pub fn id(raw: &str) -> NotionId {
    NotionId::parse(raw).expect("test id should parse")
}

pub fn api_response(status: StatusCode, body: &str) -> ApiResponse<String> {
    ApiResponse {
        data: body.to_string(),
        status,
        url: "https://api.notion.com/v1/test".to_string(),
    }
}

pub fn fixture_database(body: &str) -> Database {
    parse_database_response(api_response(StatusCode::OK, body)).expect("fixture database parses")
}

pub fn fixture_records(body: &str) -> Vec<Record> {
    parse_records_pagination(api_response(StatusCode::OK, body))
        .expect("fixture rows parse")
        .results
}

pub fn fixture_users(body: &str) -> Vec<WorkspaceUser> {
    parse_users_pagination(api_response(StatusCode::OK, body))
        .expect("fixture users parse")
        .results
}

/// A configurable fake workspace.
#[derive(Default)]
pub struct MockWorkspace {
    databases: HashMap<NotionId, Database>,
    denied: HashMap<NotionId, String>,
    rows: HashMap<NotionId, Vec<Record>>,
    failing_queries: HashSet<NotionId>,
    users: Vec<WorkspaceUser>,
    existing_titles: HashSet<String>,
    rejected_titles: HashMap<String, String>,
    pub retrievals: Mutex<Vec<NotionId>>,
    pub queries: Mutex<Vec<(NotionId, Option<String>)>>,
    pub created: Mutex<Vec<Map<String, Value>>>,
}

impl MockWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tasks and projects fixtures; the clients database is not shared.
    pub fn from_fixtures() -> Self {
        Self::new()
            .with_database(fixture_database(DATABASE_TASKS))
            .with_database(fixture_database(DATABASE_PROJECTS))
            .with_denied(CLIENTS_DB, ERROR_NOT_FOUND)
            .with_rows(TASKS_DB, fixture_records(QUERY_TASKS))
            .with_users(fixture_users(USERS))
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.databases.insert(database.id.clone(), database);
        self
    }

    /// Retrieving `raw_id` answers 404 with `error_body`.
    pub fn with_denied(mut self, raw_id: &str, error_body: &str) -> Self {
        self.denied.insert(id(raw_id), error_body.to_string());
        self
    }

    pub fn with_rows(mut self, raw_id: &str, rows: Vec<Record>) -> Self {
        self.rows.insert(id(raw_id), rows);
        self
    }

    /// Every query of `raw_id` after the first page fails.
    pub fn with_failing_pagination(mut self, raw_id: &str) -> Self {
        self.failing_queries.insert(id(raw_id));
        self
    }

    pub fn with_users(mut self, users: Vec<WorkspaceUser>) -> Self {
        self.users = users;
        self
    }

    pub fn with_existing_title(mut self, title: &str) -> Self {
        self.existing_titles.insert(title.to_string());
        self
    }

    /// Creating a page titled `title` fails with a validation error.
    pub fn with_rejected_title(mut self, title: &str, message: &str) -> Self {
        self.rejected_titles
            .insert(title.to_string(), message.to_string());
        self
    }

    pub fn retrieval_count(&self, raw_id: &str) -> usize {
        let wanted = id(raw_id);
        self.retrievals
            .lock()
            .unwrap()
            .iter()
            .filter(|id| **id == wanted)
            .count()
    }

    pub fn query_count(&self, raw_id: &str) -> usize {
        let wanted = id(raw_id);
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == wanted)
            .count()
    }
}

fn page_offset(cursor: &Option<String>) -> usize {
    cursor
        .as_deref()
        .and_then(|c| c.strip_prefix("offset-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn title_of(properties: &Map<String, Value>) -> Option<String> {
    properties.values().find_map(|prop| {
        prop.get("title")?
            .get(0)?
            .get("text")?
            .get("content")?
            .as_str()
            .map(str::to_string)
    })
}

#[async_trait::async_trait]
impl NotionRepository for MockWorkspace {
    async fn retrieve_database(&self, id: &NotionId) -> Result<Database, AppError> {
        self.retrievals.lock().unwrap().push(id.clone());

        if let Some(body) = self.denied.get(id) {
            return parse_database_response(api_response(StatusCode::NOT_FOUND, body));
        }
        self.databases.get(id).cloned().ok_or(AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            message: format!("Could not find database with ID: {}", id.to_hyphenated()),
            status: 404,
        })
    }

    async fn query_records(
        &self,
        database: &NotionId,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Record>, AppError> {
        self.queries
            .lock()
            .unwrap()
            .push((database.clone(), cursor.clone()));

        let offset = page_offset(&cursor);
        if offset > 0 && self.failing_queries.contains(database) {
            return Err(AppError::MalformedResponse("connection reset by peer".into()));
        }

        let rows = self.rows.get(database).map(Vec::as_slice).unwrap_or(&[]);
        let end = (offset + page_size as usize).min(rows.len());
        let has_more = end < rows.len();

        Ok(PaginatedResponse {
            results: rows[offset.min(end)..end].to_vec(),
            next_cursor: has_more.then(|| format!("offset-{}", end)),
            has_more,
        })
    }
}

#[async_trait::async_trait]
impl NotionWriter for MockWorkspace {
    async fn list_users(
        &self,
        _page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<WorkspaceUser>, AppError> {
        // One user per page, to exercise cursor handling.
        let offset = page_offset(&cursor);
        let has_more = offset + 1 < self.users.len();
        Ok(PaginatedResponse {
            results: self.users.get(offset).cloned().into_iter().collect(),
            next_cursor: has_more.then(|| format!("offset-{}", offset + 1)),
            has_more,
        })
    }

    async fn title_exists(
        &self,
        _database: &NotionId,
        _title_property: &str,
        title: &str,
    ) -> Result<bool, AppError> {
        Ok(self.existing_titles.contains(title))
    }

    async fn create_page(
        &self,
        _database: &NotionId,
        properties: Map<String, Value>,
    ) -> Result<(), AppError> {
        if let Some(message) = title_of(&properties).and_then(|t| self.rejected_titles.get(&t)) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::ValidationFailed,
                message: message.clone(),
                status: 400,
            });
        }
        self.created.lock().unwrap().push(properties);
        Ok(())
    }
}
