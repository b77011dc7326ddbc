//! Read access to Messages databases.
//!
//! The core search logic only ever talks to the [`MessageSource`] trait, so
//! it can run against the real `chat.db` schema or an in-memory fake in
//! tests. [`ChatDb`] is the rusqlite adapter for the on-disk format.

use chrono::DateTime;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Seconds between the unix epoch and 2001-01-01T00:00:00Z, the epoch the
/// Messages database counts from.
const APPLE_EPOCH_OFFSET: i64 = 978_307_200;

/// Modern Messages databases store dates in nanoseconds since the Apple epoch.
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sender {
    Me,
    Them,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Me => write!(f, "Me"),
            Sender::Them => write!(f, "Them"),
        }
    }
}

/// A single message as read from a source.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    /// Raw store timestamp, nanoseconds since the Apple epoch.
    pub raw_timestamp: i64,
    /// Human-readable UTC form of `raw_timestamp`.
    pub timestamp_display: String,
    /// The handle string the message belongs to.
    pub contact: String,
    pub sender: Sender,
    /// Message text; empty when the store has no text for this row.
    pub body: String,
}

/// Convert a raw store timestamp to a human-readable UTC string.
pub fn format_raw_timestamp(raw: i64) -> String {
    let unix_secs = raw / NANOS_PER_SECOND + APPLE_EPOCH_OFFSET;
    match DateTime::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format!("(unrepresentable: {})", raw),
    }
}

/// Failure reading from a source, scoped for diagnosis.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open {source_label}: {cause}")]
    Open {
        source_label: String,
        #[source]
        cause: rusqlite::Error,
    },
    #[error("query against {source_label} failed: {cause}")]
    Query {
        source_label: String,
        #[source]
        cause: rusqlite::Error,
    },
}

/// Capability interface over a message store.
///
/// Two read operations are all the search needs; anything that can list its
/// handles and produce a handle's earliest message can back a search.
pub trait MessageSource {
    /// Identity used in diagnostics and in the final result.
    fn label(&self) -> &str;

    /// Whether the source can be queried at all. Unreachable sources are
    /// expected (the backup copy may not exist on this machine) and are
    /// skipped without comment.
    fn is_reachable(&self) -> bool;

    /// Distinct raw handle strings, in a deterministic order.
    fn distinct_handles(&self) -> Result<Vec<String>, ReadError>;

    /// The minimal-raw-timestamp message for `handle`, or `None` when the
    /// handle has no messages.
    fn earliest_message(&self, handle: &str) -> Result<Option<MessageRecord>, ReadError>;
}

/// rusqlite adapter over the Messages `chat.db` schema.
///
/// Every call opens a fresh read-only connection, runs one query, and drops
/// the connection. A query is single-shot, so there is nothing to pool.
pub struct ChatDb {
    path: PathBuf,
    label: String,
}

impl ChatDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }

    fn connect(&self) -> Result<Connection, ReadError> {
        Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|cause| {
            ReadError::Open {
                source_label: self.label.clone(),
                cause,
            }
        })
    }

    fn query_error(&self, cause: rusqlite::Error) -> ReadError {
        ReadError::Query {
            source_label: self.label.clone(),
            cause,
        }
    }
}

impl MessageSource for ChatDb {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_reachable(&self) -> bool {
        self.path.exists()
    }

    fn distinct_handles(&self) -> Result<Vec<String>, ReadError> {
        let conn = self.connect()?;

        // ORDER BY makes handle enumeration (and thus tie-breaking in the
        // reducer) deterministic; sqlite gives no stable order otherwise.
        let mut stmt = conn
            .prepare("SELECT DISTINCT id FROM handle ORDER BY id")
            .map_err(|e| self.query_error(e))?;

        let handles = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| self.query_error(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.query_error(e))?;

        Ok(handles)
    }

    fn earliest_message(&self, handle: &str) -> Result<Option<MessageRecord>, ReadError> {
        let conn = self.connect()?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT m.date, h.id, m.is_from_me, COALESCE(m.text, '')
                FROM message m
                JOIN handle h ON m.handle_id = h.ROWID
                WHERE h.id = ?1
                ORDER BY m.date ASC, m.ROWID ASC
                LIMIT 1
                "#,
            )
            .map_err(|e| self.query_error(e))?;

        let record = stmt
            .query_row([handle], |row| {
                let raw: i64 = row.get(0)?;
                Ok(MessageRecord {
                    raw_timestamp: raw,
                    timestamp_display: format_raw_timestamp(raw),
                    contact: row.get(1)?,
                    sender: if row.get::<_, bool>(2)? {
                        Sender::Me
                    } else {
                        Sender::Them
                    },
                    body: row.get(3)?,
                })
            })
            .optional()
            .map_err(|e| self.query_error(e))?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seed_db(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("chat.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE handle (ROWID INTEGER PRIMARY KEY, id TEXT NOT NULL UNIQUE);
            CREATE TABLE message (
                ROWID INTEGER PRIMARY KEY,
                date INTEGER NOT NULL,
                text TEXT,
                is_from_me INTEGER NOT NULL DEFAULT 0,
                handle_id INTEGER NOT NULL REFERENCES handle(ROWID)
            );

            INSERT INTO handle (ROWID, id) VALUES (1, '+1-555-0100'), (2, '555.0100');
            INSERT INTO message (date, text, is_from_me, handle_id) VALUES
                (2000000000000, 'later', 0, 1),
                (1000000000000, 'hi', 0, 1),
                (3000000000000, NULL, 1, 2);
            "#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_distinct_handles_sorted() {
        let dir = TempDir::new().unwrap();
        let db = ChatDb::new(seed_db(&dir));
        assert_eq!(db.distinct_handles().unwrap(), vec!["+1-555-0100", "555.0100"]);
    }

    #[test]
    fn test_earliest_message_picks_minimum_date() {
        let dir = TempDir::new().unwrap();
        let db = ChatDb::new(seed_db(&dir));
        let msg = db.earliest_message("+1-555-0100").unwrap().unwrap();
        assert_eq!(msg.raw_timestamp, 1000000000000);
        assert_eq!(msg.body, "hi");
        assert_eq!(msg.contact, "+1-555-0100");
        assert_eq!(msg.sender, Sender::Them);
    }

    #[test]
    fn test_null_text_becomes_empty_body() {
        let dir = TempDir::new().unwrap();
        let db = ChatDb::new(seed_db(&dir));
        let msg = db.earliest_message("555.0100").unwrap().unwrap();
        assert_eq!(msg.body, "");
        assert_eq!(msg.sender, Sender::Me);
    }

    #[test]
    fn test_unknown_handle_yields_none() {
        let dir = TempDir::new().unwrap();
        let db = ChatDb::new(seed_db(&dir));
        assert!(db.earliest_message("+9 999 9999").unwrap().is_none());
    }

    #[test]
    fn test_missing_file_is_unreachable() {
        let db = ChatDb::new("/nonexistent/chat.db");
        assert!(!db.is_reachable());
    }

    #[test]
    fn test_format_raw_timestamp_applies_apple_epoch() {
        // 2001-01-01T00:00:01Z
        assert_eq!(format_raw_timestamp(1_000_000_000), "2001-01-01 00:00:01");
    }
}
