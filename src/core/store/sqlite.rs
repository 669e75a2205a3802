//! SQLite store backend.
//!
//! A durable single-node backend for submissions and earnings. The
//! connection is serialized behind a mutex; every operation is short
//! enough that this never becomes a contention point at intake volumes.

use super::{EarningsStore, SubmissionStore};
use crate::core::scanner::HistoryEntry;
use crate::error::StoreError;
use crate::model::{EarningsSnapshot, NewSubmission, SubmissionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// SQLite-backed store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::OpenFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| StoreError::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_connection(conn)
    }

    /// Open an in-memory database, useful for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::OpenFailed {
            path: ":memory:".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS submissions (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                platform TEXT NOT NULL,
                screenshot_ref TEXT NOT NULL,
                image_hash TEXT,
                status TEXT NOT NULL,
                amount_cents INTEGER NOT NULL,
                rejection_reason TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_submissions_user_created
             ON submissions(user_id, created_at DESC)",
            [],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS earnings (
                user_id INTEGER PRIMARY KEY,
                total_earned_cents INTEGER NOT NULL DEFAULT 0,
                available_balance_cents INTEGER NOT NULL DEFAULT 0,
                pending_withdrawal_cents INTEGER NOT NULL DEFAULT 0,
                withdrawn_cents INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::QueryFailed("connection lock poisoned".to_string()))
    }
}

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn recent_fingerprints(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, image_hash, created_at FROM submissions
                 WHERE user_id = ?1 AND status != 'rejected'
                 ORDER BY created_at DESC
                 LIMIT ?2",
            )
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map(params![user.0 as i64, limit as i64], |row| {
                let id: String = row.get(0)?;
                let fingerprint: Option<String> = row.get(1)?;
                let created_at: String = row.get(2)?;
                Ok((id, fingerprint, created_at))
            })
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, fingerprint, created_at) =
                row.map_err(|e| StoreError::QueryFailed(e.to_string()))?;

            let submission_id = Uuid::parse_str(&id)
                .map(SubmissionId)
                .map_err(|e| StoreError::QueryFailed(format!("bad submission id {id:?}: {e}")))?;
            let submitted_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| StoreError::QueryFailed(format!("bad timestamp {created_at:?}: {e}")))?;

            entries.push(HistoryEntry {
                submission_id,
                fingerprint,
                submitted_at,
            });
        }
        Ok(entries)
    }

    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionId, StoreError> {
        let id = SubmissionId::new();
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO submissions
             (id, user_id, platform, screenshot_ref, image_hash, status, amount_cents,
              rejection_reason, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)",
            params![
                id.0.to_string(),
                submission.user.0 as i64,
                submission.platform.as_str(),
                submission.screenshot_ref,
                submission.image_hash,
                submission.status.as_str(),
                submission.amount_cents,
                submission.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(id)
    }
}

#[async_trait]
impl EarningsStore for SqliteStore {
    async fn credit(
        &self,
        user: UserId,
        amount_cents: i64,
    ) -> Result<EarningsSnapshot, StoreError> {
        if amount_cents <= 0 {
            return Err(StoreError::QueryFailed(format!(
                "credit amount must be positive, got {amount_cents}"
            )));
        }

        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO earnings (user_id, total_earned_cents, available_balance_cents)
             VALUES (?1, ?2, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                 total_earned_cents = total_earned_cents + ?2,
                 available_balance_cents = available_balance_cents + ?2",
            params![user.0 as i64, amount_cents],
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        query_snapshot(&conn, user)?.ok_or_else(|| {
            StoreError::QueryFailed("earnings row missing after credit".to_string())
        })
    }

    async fn snapshot(&self, user: UserId) -> Result<Option<EarningsSnapshot>, StoreError> {
        let conn = self.lock()?;
        query_snapshot(&conn, user)
    }
}

fn query_snapshot(conn: &Connection, user: UserId) -> Result<Option<EarningsSnapshot>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT total_earned_cents, available_balance_cents,
                    pending_withdrawal_cents, withdrawn_cents
             FROM earnings WHERE user_id = ?1",
        )
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

    let mut rows = stmt
        .query_map(params![user.0 as i64], |row| {
            Ok(EarningsSnapshot {
                total_earned_cents: row.get(0)?,
                available_balance_cents: row.get(1)?,
                pending_withdrawal_cents: row.get(2)?,
                withdrawn_cents: row.get(3)?,
            })
        })
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

    match rows.next() {
        Some(row) => row
            .map(Some)
            .map_err(|e| StoreError::QueryFailed(e.to_string())),
        None => Ok(None),
    }
}
