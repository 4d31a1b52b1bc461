// src/collector/reference.rs
//! Reference sampling: the known values of each property, used to ground
//! the extractor's output.

use crate::api::{collect_pages, NotionRepository, PaginationStop};
use crate::model::{CellValue, Database, Record};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Property name → sorted known values. Only properties with at least one
/// value appear.
pub type ReferenceTable = IndexMap<String, Vec<String>>;

/// Samples reference values for a database from its schema and its rows.
pub struct ReferenceSampler<'a> {
    repo: &'a dyn NotionRepository,
    max_rows: usize,
}

impl<'a> ReferenceSampler<'a> {
    pub fn new(repo: &'a dyn NotionRepository, max_rows: usize) -> Self {
        Self { repo, max_rows }
    }

    /// Builds the reference table for `database`.
    ///
    /// Declared choice options are always included. Rows are read up to the
    /// configured cap; a failed page ends sampling with what was read so far.
    pub async fn sample(&self, database: &Database) -> ReferenceTable {
        let mut values = ValueSets::seeded(database);

        let result = collect_pages(
            |page_size, cursor| self.repo.query_records(&database.id, page_size, cursor),
            Some(self.max_rows),
        )
        .await;

        match &result.stop {
            PaginationStop::Interrupted { cause } => log::warn!(
                "Sampling of '{}' stopped after {} row(s): {}",
                database.display_title(),
                result.items.len(),
                cause
            ),
            PaginationStop::CapReached => log::info!(
                "Sampling of '{}' capped at {} row(s)",
                database.display_title(),
                self.max_rows
            ),
            PaginationStop::Exhausted => log::debug!(
                "Sampled {} row(s) of '{}' in {} page(s)",
                result.items.len(),
                database.display_title(),
                result.pages_fetched
            ),
        }

        for record in &result.items {
            values.observe(record);
        }

        values.finish()
    }
}

/// Per-property value sets, in first-seen property order.
#[derive(Debug, Default)]
struct ValueSets {
    sets: IndexMap<String, BTreeSet<String>>,
}

impl ValueSets {
    /// Seeds from non-empty option lists of select, multi_select and status.
    fn seeded(database: &Database) -> Self {
        let mut sets = Self::default();
        for (name, prop) in &database.properties {
            if let Some(options) = prop.kind.declared_options() {
                if !options.is_empty() {
                    sets.extend(name, options.iter().cloned());
                }
            }
        }
        sets
    }

    fn observe(&mut self, record: &Record) {
        for (name, cell) in &record.cells {
            match cell {
                CellValue::Title(text) if !text.is_empty() => {
                    self.extend(name, std::iter::once(text.clone()))
                }
                CellValue::People(names) => self.extend(name, names.iter().cloned()),
                CellValue::Relation(ids) => self.extend(name, ids.iter().cloned()),
                _ => {}
            }
        }
    }

    fn extend(&mut self, name: &str, values: impl IntoIterator<Item = String>) {
        let mut values = values.into_iter().filter(|v| !v.is_empty()).peekable();
        if values.peek().is_none() {
            return;
        }
        self.sets.entry(name.to_string()).or_default().extend(values);
    }

    fn finish(self) -> ReferenceTable {
        self.sets
            .into_iter()
            .map(|(name, set)| (name, set.into_iter().collect()))
            .collect()
    }
}
