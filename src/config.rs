// src/config.rs
use crate::constants::{NOTION_API_VERSION, REFERENCE_SAMPLE_MAX_ROWS, UPLOAD_PACING};
use crate::error::AppError;
use crate::types::{ApiBaseUrl, ApiKey, NotionId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect the schema and reference values of a database and everything it relates to
    Schema {
        /// Root database URL or ID (defaults to NOTION_DATABASE_ID)
        #[arg(short, long)]
        database: Option<String>,

        /// Write the JSON payload to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Maximum rows read per database while sampling reference values
        #[arg(long, default_value_t = REFERENCE_SAMPLE_MAX_ROWS)]
        max_rows: usize,
    },

    /// Upload extracted tasks (a JSON array of objects) into the database
    Upload {
        /// Path to the tasks JSON file
        tasks_json: PathBuf,

        /// Target database URL or ID (defaults to NOTION_DATABASE_ID)
        #[arg(short, long)]
        database: Option<String>,

        /// Write the upload results to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Pause between page creations, in milliseconds
        #[arg(long, default_value_t = UPLOAD_PACING.as_millis() as u64)]
        delay_ms: u64,
    },
}

/// Which stage a run executes, with its stage-specific settings.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    CollectSchema { max_rows: usize },
    UploadTasks { tasks_file: PathBuf, pacing: Duration },
}

/// Resolved configuration, validated and ready to drive a stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub database_id: NotionId,
    pub api_key: ApiKey,
    pub api_base_url: ApiBaseUrl,
    pub notion_version: String,
    pub output_file: Option<PathBuf>,
    pub stage: Stage,
}

impl PipelineConfig {
    /// Resolves configuration from CLI input and the process environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolves configuration with an explicit environment lookup.
    ///
    /// Empty variables are treated as unset.
    pub fn resolve_with<F>(cli: CommandLineInput, env: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let token = lookup("NOTION_TOKEN")
            .or_else(|| lookup("NOTION_API_KEY"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "NOTION_TOKEN (or NOTION_API_KEY) environment variable not set".to_string(),
                )
            })?;
        let api_key = ApiKey::new(token.trim())?;

        let api_base_url = match lookup("NOTION_API_BASE_URL") {
            Some(raw) => ApiBaseUrl::parse(raw.trim())?,
            None => ApiBaseUrl::default(),
        };
        let notion_version =
            lookup("NOTION_VERSION").unwrap_or_else(|| NOTION_API_VERSION.to_string());

        let (database, output, stage) = match cli.command {
            Command::Schema {
                database,
                output,
                max_rows,
            } => (database, output, Stage::CollectSchema { max_rows }),
            Command::Upload {
                tasks_json,
                database,
                output,
                delay_ms,
            } => (
                database,
                output,
                Stage::UploadTasks {
                    tasks_file: tasks_json,
                    pacing: Duration::from_millis(delay_ms),
                },
            ),
        };

        let raw_database = database
            .or_else(|| lookup("NOTION_DATABASE_ID"))
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "NOTION_DATABASE_ID environment variable not set and no --database given"
                        .to_string(),
                )
            })?;
        let database_id = NotionId::parse(&raw_database)?;

        Ok(PipelineConfig {
            database_id,
            api_key,
            api_base_url,
            notion_version,
            output_file: output.map(PathBuf::from),
            stage,
        })
    }
}
