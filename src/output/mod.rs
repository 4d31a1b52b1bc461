// src/output/mod.rs
//! Output handling with planning separated from execution.
//!
//! Callers build an [`OutputPlan`] (pure), then [`deliver`] performs the I/O.

mod types;
mod writer;

pub use types::{CompletedOperation, DeliveryTarget, FailedOperation, OutputPlan, OutputReport};
pub use writer::{deliver, deliver_all};
