//! SQLite-backed feedback persistence.
//!
//! The store owns a single append-only `feedback` table. Rows are written
//! once and only ever read back, either by time window or by exact term.

use crate::error::{Error, Result};
use crate::models::FeedbackRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Durable store for feedback rows.
pub struct FeedbackStore {
    conn: Mutex<Connection>,
}

impl FeedbackStore {
    /// Open (or create) a feedback database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::init_schema(&conn)?;
        debug!("Feedback store opened at {}", path.as_ref().display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (used by tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                term TEXT NOT NULL,
                original_suggestion TEXT NOT NULL,
                is_helpful INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                context TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Append one feedback row. Returns the assigned row id.
    pub fn append(&self, record: &FeedbackRecord) -> Result<i64> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::StoreUnavailable(format!("lock poisoned: {e}")))?;

        conn.execute(
            "INSERT INTO feedback (term, original_suggestion, is_helpful, timestamp, context)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.term,
                record.original_suggestion,
                record.is_helpful,
                encode_timestamp(&record.timestamp),
                record.context,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// All rows with `timestamp >= cutoff`, in insertion order.
    pub fn records_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<FeedbackRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::StoreUnavailable(format!("lock poisoned: {e}")))?;

        let mut stmt = conn.prepare(
            "SELECT term, original_suggestion, is_helpful, timestamp, context
             FROM feedback
             WHERE timestamp >= ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![encode_timestamp(&cutoff)], row_to_record)?;
        collect_rows(rows)
    }

    /// All rows for an exact term, in insertion order, unbounded in time.
    pub fn records_for_term(&self, term: &str) -> Result<Vec<FeedbackRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::StoreUnavailable(format!("lock poisoned: {e}")))?;

        let mut stmt = conn.prepare(
            "SELECT term, original_suggestion, is_helpful, timestamp, context
             FROM feedback
             WHERE term = ?1
             ORDER BY id",
        )?;

        let rows = stmt.query_map(params![term], row_to_record)?;
        collect_rows(rows)
    }
}

/// Timestamps are stored as fixed-width RFC 3339 UTC strings so that
/// lexicographic comparison in SQL matches chronological order.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedbackRecord> {
    let raw_ts: String = row.get(3)?;
    let timestamp = DateTime::parse_from_rfc3339(&raw_ts)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(FeedbackRecord {
        term: row.get(0)?,
        original_suggestion: row.get(1)?,
        is_helpful: row.get(2)?,
        timestamp,
        context: row.get(4)?,
    })
}

fn collect_rows(
    rows: impl Iterator<Item = rusqlite::Result<FeedbackRecord>>,
) -> Result<Vec<FeedbackRecord>> {
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}
