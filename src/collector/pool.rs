// src/collector/pool.rs
//! In-memory arena of fetched databases plus the traversal bookkeeping.
//!
//! Databases refer to each other by id only, never by reference, so mutually
//! related databases need no shared ownership.

use crate::error::DatabaseFetchFailure;
use crate::model::Database;
use crate::types::NotionId;
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// Fetched databases keyed by canonical id, in fetch order.
#[derive(Debug, Clone, Default)]
pub struct DatabasePool {
    databases: IndexMap<NotionId, Database>,
}

impl DatabasePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, database: Database) {
        self.databases.insert(database.id.clone(), database);
    }

    pub fn get(&self, id: &NotionId) -> Option<&Database> {
        self.databases.get(id)
    }

    pub fn contains(&self, id: &NotionId) -> bool {
        self.databases.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.databases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Databases in the order they were fetched.
    pub fn iter(&self) -> impl Iterator<Item = &Database> {
        self.databases.values()
    }
}

impl FromIterator<Database> for DatabasePool {
    fn from_iter<I: IntoIterator<Item = Database>>(iter: I) -> Self {
        let mut pool = DatabasePool::new();
        for database in iter {
            pool.insert(database);
        }
        pool
    }
}

/// FIFO queue of databases still to fetch.
///
/// Remembers everything ever enqueued, so a database reached through several
/// relations (or through itself) is fetched once.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<NotionId>,
    enqueued: HashSet<NotionId>,
}

impl Frontier {
    pub fn seeded(root: NotionId) -> Self {
        let mut frontier = Self::default();
        frontier.push(root);
        frontier
    }

    /// Enqueues `id` unless it was enqueued before. Returns whether it was added.
    pub fn push(&mut self, id: NotionId) -> bool {
        if !self.enqueued.insert(id.clone()) {
            return false;
        }
        self.queue.push_back(id);
        true
    }

    pub fn pop(&mut self) -> Option<NotionId> {
        self.queue.pop_front()
    }
}

/// A referenced database the integration could not read.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingDatabase {
    pub id: NotionId,
    pub reason: DatabaseFetchFailure,
}

impl MissingDatabase {
    /// User-facing hint printed for each missing database.
    pub fn access_warning(&self) -> String {
        format!(
            "Access to database {} is required, please add this as a Connection on notion.so",
            self.id.to_hyphenated()
        )
    }
}
