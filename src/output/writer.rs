// src/output/writer.rs
//! Executes output plans. The only place the payload touches the filesystem
//! or stdout.

use super::types::*;
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Performs every operation in the plan; failures are collected, not raised.
pub fn deliver(plan: OutputPlan) -> OutputReport {
    let mut report = OutputReport::new();

    for operation in plan.operations {
        match execute_operation(&operation) {
            Ok(bytes_written) => {
                report = report.with_completed(CompletedOperation {
                    operation,
                    bytes_written,
                });
            }
            Err(e) => {
                log::error!("Delivery to {} failed: {}", operation.describe(), e);
                report = report.with_failed(FailedOperation {
                    operation,
                    error: e.to_string(),
                });
            }
        }
    }

    log::debug!(
        "Delivered {} byte(s): {} succeeded, {} failed",
        report.bytes_written,
        report.completed.len(),
        report.failed.len()
    );

    report
}

/// Like [`deliver`], but any failed operation becomes an error.
pub fn deliver_all(plan: OutputPlan) -> Result<OutputReport, AppError> {
    let report = deliver(plan);
    if !report.is_success() {
        return Err(AppError::DeliveryFailed {
            failures: report.failed.iter().map(|f| f.error.clone()).collect(),
        });
    }
    Ok(report)
}

fn execute_operation(operation: &DeliveryTarget) -> Result<usize, AppError> {
    match operation {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::PrintToStdout { content } => {
            print_to_stdout(content)?;
            Ok(content.len())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;

    log::info!("Wrote {}", path.display());
    Ok(content.len())
}

fn print_to_stdout(content: &str) -> Result<(), AppError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", content)?;
    stdout.flush()?;
    Ok(())
}
