// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2tasks::output::{self, DeliveryTarget, OutputPlan, OutputReport};
use notion2tasks::{
    read_tasks_file, AppError, CollectionReport, CommandLineInput, NotionHttpClient,
    PayloadDelivery, PipelineConfig, SchemaCollector, SchemaSource, Stage, TaskSink,
    TaskUploader, UploadOutcome, UploadStatus,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Sets up logging. The console appender writes to stderr; stdout carries
/// only the JSON payload.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2tasks.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(log_level)))
                .build("stderr", Box::new(stderr_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Runs the configured stage against the live API.
async fn execute_stage(config: &PipelineConfig) -> Result<(), AppError> {
    let client = NotionHttpClient::new(
        &config.api_key,
        config.api_base_url.clone(),
        &config.notion_version,
    )?;
    let runner = StageRunner::new(config);

    match &config.stage {
        Stage::CollectSchema { max_rows } => {
            let collector = SchemaCollector::new(Arc::new(client)).with_max_rows(*max_rows);
            runner.run_schema(&collector).await
        }
        Stage::UploadTasks { tasks_file, pacing } => {
            let uploader =
                TaskUploader::new(&client, config.database_id.clone()).with_pacing(*pacing);
            runner.run_upload(&uploader, tasks_file).await
        }
    }
}

/// Wires a stage to its delivery and reports to the user.
struct StageRunner<'a> {
    config: &'a PipelineConfig,
}

impl<'a> StageRunner<'a> {
    fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    async fn run_schema(&self, source: &dyn SchemaSource) -> Result<(), AppError> {
        let report = source.collect_schema(&self.config.database_id).await;
        let rendered = report.payload.to_json_pretty()?;
        let delivered = self.deliver(rendered)?;

        self.report_schema(&report, &delivered);
        Ok(())
    }

    async fn run_upload(&self, sink: &dyn TaskSink, tasks_file: &Path) -> Result<(), AppError> {
        let tasks = read_tasks_file(tasks_file)?;
        log::info!("Read {} task(s) from {}", tasks.len(), tasks_file.display());

        let outcomes = sink.upload_tasks(&tasks).await?;
        let rendered = serde_json::to_string_pretty(&outcomes)?;
        let delivered = self.deliver(rendered)?;

        self.report_upload(&outcomes, &delivered);
        Ok(())
    }

    /// Missing-access lines always go to stderr, never into the payload.
    fn report_schema(&self, report: &CollectionReport, delivered: &OutputReport) {
        for warning in report.access_warnings() {
            eprintln!("{}", warning);
        }
        log::info!(
            "Schema payload covers {} database(s)",
            report.payload.database_count()
        );
        self.report_files(delivered, "Schema");
    }

    fn report_upload(&self, outcomes: &[UploadOutcome], delivered: &OutputReport) {
        let created = outcomes
            .iter()
            .filter(|o| o.status == UploadStatus::Created)
            .count();
        log::info!("Created {} of {} task(s)", created, outcomes.len());
        self.report_files(delivered, "Upload results");
    }

    fn report_files(&self, delivered: &OutputReport, what: &str) {
        for completed in &delivered.completed {
            if let DeliveryTarget::WriteFile { path, .. } = &completed.operation {
                eprintln!("✓ {} saved to {}", what, path.display());
            }
        }
    }
}

impl PayloadDelivery for StageRunner<'_> {
    fn deliver(&self, rendered: String) -> Result<OutputReport, AppError> {
        let plan = OutputPlan::for_destination(self.config.output_file.clone(), rendered);
        output::deliver_all(plan)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = match PipelineConfig::resolve(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(2);
        }
    };

    log::debug!(
        "Resolved configuration: database {}, key {}, API {} ({})",
        config.database_id.to_hyphenated(),
        config.api_key,
        config.api_base_url,
        config.notion_version
    );

    if let Err(e) = execute_stage(&config).await {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
