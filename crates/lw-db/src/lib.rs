//! SQLite storage backend for lapwatch sessions.
//!
//! Implements the [`SessionStore`] capability on top of `rusqlite`.
//!
//! # Thread Safety
//!
//! A `rusqlite::Connection` is `Send` but not `Sync`, so [`Database`]
//! guards it with a `std::sync::Mutex`. SQLite calls are short and
//! local-disk bound; they run inline on the async caller rather than on a
//! blocking pool.
//!
//! # Schema
//!
//! One `sessions` table, one row per identifier. Timestamps are stored as
//! TEXT in RFC 3339 format with millisecond precision so lexicographic
//! ordering matches chronological ordering. The `data` column carries the
//! full session as a JSON payload (including laps); `start_time` and
//! `end_time` are denormalized copies for ad-hoc queries. Writes are
//! whole-row `INSERT OR REPLACE`, which matches the capability's
//! last-write-wins contract.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use lw_core::{Session, SessionId};
use lw_store::{SessionStore, StoreError};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The stored session payload could not be encoded or decoded.
    #[error("invalid session payload for {id}: {source}")]
    Payload {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    /// A previous panic poisoned the connection mutex.
    #[error("database mutex poisoned")]
    Poisoned,
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety and schema
/// notes.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        Self::init(&conn)?;
        tracing::debug!(?path, "opened session database");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init(conn: &Connection) -> Result<(), DbError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id         TEXT PRIMARY KEY,
                start_time TEXT,
                end_time   TEXT,
                data       TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn upsert(&self, session: &Session) -> Result<(), DbError> {
        let data = serde_json::to_string(session).map_err(|source| DbError::Payload {
            id: session.id().to_string(),
            source,
        })?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO sessions (id, start_time, end_time, data)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.id().as_str(),
                session.start_time().map(format_time),
                session.end_time().map(format_time),
                data,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &SessionId) -> Result<(), DbError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM sessions WHERE id = ?1", params![id.as_str()])?;
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, DbError> {
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM sessions WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        data.map(|payload| {
            serde_json::from_str(&payload).map_err(|source| DbError::Payload {
                id: id.to_string(),
                source,
            })
        })
        .transpose()
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl SessionStore for Database {
    async fn register(&self, session: &Session) -> Result<(), StoreError> {
        self.upsert(session).map_err(StoreError::backend)
    }

    async fn update(&self, session: &Session) -> Result<(), StoreError> {
        self.upsert(session).map_err(StoreError::backend)
    }

    async fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        self.delete(id).map_err(StoreError::backend)
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        self.fetch(id).map_err(StoreError::backend)
    }
}
