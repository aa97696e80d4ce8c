use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Public view of a stored score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store is unavailable: {0}")]
    Unavailable(String),
}

pub trait ScoreStore: Send + Sync {
    fn insert(&self, name: &str, score: i64) -> Result<u64, StoreError>;

    /// Highest `limit` live rows, score descending, earliest first on ties.
    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError>;
}

#[derive(Debug, Clone)]
struct Row {
    id: u64,
    record: ScoreRecord,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    table: Mutex<Table>,
}

impl MemoryScoreStore {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table.lock().map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Inserts with an explicit timestamp, for seeding.
    pub fn insert_at(&self, name: &str, score: i64, created_at: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut table = self.lock()?;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(Row {
            id,
            record: ScoreRecord { name: name.to_string(), score, created_at },
            deleted_at: None,
        });
        Ok(id)
    }

    /// Hides a row from reads without removing it. Returns false if the id
    /// is unknown or already deleted.
    pub fn soft_delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut table = self.lock()?;
        let row = table.rows.iter_mut().find(|r| r.id == id && r.deleted_at.is_none());
        Ok(match row {
            Some(row) => {
                row.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        })
    }

    pub fn live_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.iter().filter(|r| r.deleted_at.is_none()).count())
    }
}

impl ScoreStore for MemoryScoreStore {
    fn insert(&self, name: &str, score: i64) -> Result<u64, StoreError> {
        self.insert_at(name, score, Utc::now())
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        let table = self.lock()?;
        let mut live: Vec<&Row> = table.rows.iter().filter(|r| r.deleted_at.is_none()).collect();
        live.sort_by(|a, b| {
            b.record
                .score
                .cmp(&a.record.score)
                .then(a.record.created_at.cmp(&b.record.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(live.into_iter().take(limit).map(|r| r.record.clone()).collect())
    }
}
