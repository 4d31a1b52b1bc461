// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Reading these constants should tell you how the collector behaves: how
//! much it samples, how it pages, what it writes when it cannot resolve
//! something, and how gently it writes back.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Notion API version header sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many records the Notion API returns per page of query results.
pub const NOTION_API_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Schema collection
// ---------------------------------------------------------------------------

/// Hard cap on records examined per database while sampling reference values.
pub const REFERENCE_SAMPLE_MAX_ROWS: usize = 10_000;

/// Stands in for a relation/rollup target that could not be resolved.
pub const UNRESOLVED_MARKER: &str = "?";

/// Title used for databases whose title is empty.
pub const UNTITLED_DATABASE: &str = "(Untitled)";

// ---------------------------------------------------------------------------
// Task upload
// ---------------------------------------------------------------------------

/// Pause between consecutive page creations, to stay under Notion's rate limit.
pub const UPLOAD_PACING: Duration = Duration::from_millis(400);

/// Field of an extracted task that carries its name.
pub const TASK_NAME_FIELD: &str = "Task name";

/// Task names too generic to be worth creating.
pub const BLOCKED_TASK_NAMES: &[&str] = &["ToDo", "Task", "Untitled", "(unnamed task)"];

/// Label used in upload results for tasks without a name.
pub const UNNAMED_TASK: &str = "(unnamed)";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
