//! Database module for the interview relay
//!
//! Provides persistence for interview sessions. Each session is stored as a
//! single row keyed by its id, with the turn history kept as a JSON document.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt session history: {0}")]
    History(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Session Operations ====================

    /// Get session by id, `None` if it was never saved
    pub fn get_session(&self, session_id: &str) -> DbResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT session_id, job_title, history, created_at, updated_at
             FROM sessions WHERE session_id = ?1",
        )?;

        let row = stmt
            .query_row(params![session_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .optional()?;

        let Some((session_id, job_title, history_json, created_at, updated_at)) = row else {
            return Ok(None);
        };

        Ok(Some(Session {
            session_id,
            job_title,
            history: serde_json::from_str(&history_json)?,
            created_at: parse_datetime(&created_at),
            updated_at: parse_datetime(&updated_at),
        }))
    }

    /// Insert or replace a session in a single statement.
    ///
    /// `updated_at` is refreshed; `created_at` keeps the value of the first
    /// write. Returns the record as stored.
    pub fn upsert_session(&self, session: &Session) -> DbResult<Session> {
        let history_json = serde_json::to_string(&session.history)?;
        let now = Utc::now();

        let conn = self.conn.lock().unwrap();
        let created_at: String = conn.query_row(
            "INSERT INTO sessions (session_id, job_title, history, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(session_id) DO UPDATE SET
                job_title = excluded.job_title,
                history = excluded.history,
                updated_at = excluded.updated_at
             RETURNING created_at",
            params![
                session.session_id,
                session.job_title,
                history_json,
                session.created_at.to_rfc3339(),
                now.to_rfc3339()
            ],
            |row| row.get(0),
        )?;

        Ok(Session {
            created_at: parse_datetime(&created_at),
            updated_at: now,
            ..session.clone()
        })
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
