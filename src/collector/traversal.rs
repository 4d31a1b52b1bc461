// src/collector/traversal.rs
//! Breadth-first discovery of every database reachable through relations.

use super::pool::{DatabasePool, Frontier, MissingDatabase};
use crate::api::NotionRepository;
use crate::error::classify_database_fetch_failure;
use crate::types::NotionId;

/// What a traversal found.
#[derive(Debug, Default)]
pub struct Discovery {
    pub pool: DatabasePool,
    /// Sorted by id.
    pub missing: Vec<MissingDatabase>,
}

/// Fetches `root` and, transitively, the target of every relation property.
///
/// Each database is requested at most once. A database that cannot be
/// fetched is recorded as missing and its relations are not followed; the
/// traversal itself never fails.
pub async fn discover(repo: &dyn NotionRepository, root: &NotionId) -> Discovery {
    let mut pool = DatabasePool::new();
    let mut missing = Vec::new();
    let mut frontier = Frontier::seeded(root.clone());

    while let Some(id) = frontier.pop() {
        let database = match repo.retrieve_database(&id).await {
            Ok(database) => database,
            Err(e) => {
                let reason = classify_database_fetch_failure(&e);
                log::info!("Cannot read database {}: {}", id.to_hyphenated(), reason);
                missing.push(MissingDatabase { id, reason });
                continue;
            }
        };

        log::info!(
            "Fetched database '{}' ({} properties)",
            database.display_title(),
            database.properties.len()
        );

        for target in database.relation_targets() {
            if !pool.contains(target) && *target != database.id && frontier.push(target.clone()) {
                log::debug!("Queued related database {}", target.to_hyphenated());
            }
        }

        pool.insert(database);
    }

    missing.sort_by(|a, b| a.id.cmp(&b.id));

    log::info!(
        "Discovered {} database(s), {} inaccessible",
        pool.len(),
        missing.len()
    );

    Discovery { pool, missing }
}
