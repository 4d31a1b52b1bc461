// src/output/types.rs
//! Plans and reports for delivering a rendered payload.

use std::path::PathBuf;

/// The deliveries to perform, in order.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    /// A file when `output` is given, stdout otherwise.
    pub fn for_destination(output: Option<PathBuf>, content: String) -> Self {
        let target = match output {
            Some(path) => DeliveryTarget::WriteFile { path, content },
            None => DeliveryTarget::PrintToStdout { content },
        };
        Self::new().with_operation(target)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryTarget {
    /// Write content to a file, creating parent directories.
    WriteFile { path: PathBuf, content: String },
    PrintToStdout { content: String },
}

impl DeliveryTarget {
    pub fn describe(&self) -> String {
        match self {
            Self::WriteFile { path, .. } => path.display().to_string(),
            Self::PrintToStdout { .. } => "stdout".to_string(),
        }
    }
}

/// Result of executing an output plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub bytes_written: usize,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.failed.push(operation);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}
