// src/collector/mod.rs
//! Schema collector: walks the graph of related databases from a root,
//! normalizes every schema it reached, and samples reference values.
//!
//! The run has three sequential phases:
//! 1. [`traversal::discover`] fills a [`DatabasePool`] breadth-first.
//! 2. [`schema::normalize_database`] resolves relations and rollups against
//!    the finished pool.
//! 3. [`ReferenceSampler`] reads each database's rows.
//!
//! None of them fail the run; unreachable databases end up in
//! [`CollectionReport::missing`].

pub mod payload;
pub mod pool;
pub mod reference;
pub mod schema;
pub mod traversal;

pub use payload::{CollectionReport, SchemaPayload};
pub use pool::{DatabasePool, Frontier, MissingDatabase};
pub use reference::{ReferenceSampler, ReferenceTable};
pub use schema::{normalize_database, DatabaseSchema, PropertyTarget, SchemaProperty};
pub use traversal::{discover, Discovery};

use crate::api::NotionRepository;
use crate::constants::REFERENCE_SAMPLE_MAX_ROWS;
use crate::types::NotionId;
use std::sync::Arc;

/// Drives one collection run against a repository.
#[derive(Clone)]
pub struct SchemaCollector {
    repo: Arc<dyn NotionRepository>,
    max_rows: usize,
}

impl SchemaCollector {
    pub fn new(repo: Arc<dyn NotionRepository>) -> Self {
        Self {
            repo,
            max_rows: REFERENCE_SAMPLE_MAX_ROWS,
        }
    }

    /// Caps the number of rows read per database while sampling.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub async fn collect(&self, root: &NotionId) -> CollectionReport {
        let Discovery { pool, missing } = discover(self.repo.as_ref(), root).await;

        let sampler = ReferenceSampler::new(self.repo.as_ref(), self.max_rows);
        let mut payload = SchemaPayload::default();

        for database in pool.iter() {
            let key = database.id.as_str().to_string();
            payload
                .schema
                .insert(key.clone(), normalize_database(database, &pool));
            payload.reference.insert(key, sampler.sample(database).await);
        }

        log::info!(
            "Collected schema for {} database(s) from root {}",
            payload.database_count(),
            root.to_hyphenated()
        );

        CollectionReport { payload, missing }
    }
}
