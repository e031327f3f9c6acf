//! `SQLite` persistence using `SQLx`
//!
//! One database file holds two things:
//! - `users`: the ledger (`UserLedger` implementation)
//! - `queue_entries`: the last committed queue snapshot, rewritten after
//!   every successful mutation in the same transaction as any stats change

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::path::Path;

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tableq_core::{Error, QueueEntry, Result, UserLedger, UserRecord, WaitQueue};

const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Database schema as SQL string - executed once on open
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY CHECK(version = 1)
);

CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL,
    wins INTEGER NOT NULL DEFAULT 0 CHECK(wins >= 0),
    losses INTEGER NOT NULL DEFAULT 0 CHECK(losses >= 0)
);

CREATE TABLE IF NOT EXISTS queue_entries (
    position INTEGER PRIMARY KEY CHECK(position >= 1),
    username TEXT UNIQUE NOT NULL
);
";

/// Ledger and queue snapshot store backed by a connection pool
#[derive(Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteLedger").finish_non_exhaustive()
    }
}

impl SqliteLedger {
    /// Open or create the database at the given path
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the parent directory cannot be created and
    /// `Error::ServiceUnavailable` if the database cannot be opened or has
    /// an unexpected schema version.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::io_error(format!("Failed to create parent directory: {e}"))
                })?;
            }
        }

        let path_str = path.to_str().ok_or_else(|| {
            Error::invalid_config("Database path contains invalid UTF-8".to_string())
        })?;

        let db_url = if path.is_absolute() {
            format!("sqlite:///{path_str}?mode=rwc")
        } else {
            format!("sqlite:{path_str}?mode=rwc")
        };

        let pool = SqlitePool::connect(&db_url)
            .await
            .map_err(|e| unavailable("connect to database", &e))?;

        init_schema(&pool).await?;
        check_schema_version(&pool).await?;
        Ok(Self { pool })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // QUEUE SNAPSHOT
    // ═══════════════════════════════════════════════════════════════════════

    /// Restore the last committed queue.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the stored rows break the queue
    /// invariants, or `Error::ServiceUnavailable` if the query fails.
    pub async fn load_queue(&self) -> Result<WaitQueue> {
        let rows = sqlx::query("SELECT username, position FROM queue_entries ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("read queue", &e))?;

        let entries = rows
            .iter()
            .map(parse_queue_row)
            .collect::<Result<Vec<_>>>()?;

        WaitQueue::from_entries(entries)
    }

    /// Write updated user records and the queue snapshot in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if a record names an unknown user and
    /// `Error::ServiceUnavailable` if any statement fails. Nothing is written
    /// in either case.
    pub async fn commit_state(
        &self,
        records: &[UserRecord],
        entries: &[QueueEntry],
    ) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| unavailable("begin state transaction", &e))?;

        for record in records {
            let result = sqlx::query("UPDATE users SET wins = ?, losses = ? WHERE username = ?")
                .bind(i64::from(record.wins))
                .bind(i64::from(record.losses))
                .bind(&record.username)
                .execute(&mut *tx)
                .await
                .map_err(|e| unavailable("update user", &e))?;

            if result.rows_affected() == 0 {
                return Err(Error::NotFound(record.username.clone()));
            }
        }

        sqlx::query("DELETE FROM queue_entries")
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable("clear stored queue", &e))?;

        for entry in entries {
            let position = i64::try_from(entry.position).map_err(|e| {
                Error::invalid_config(format!("Queue position out of range: {e}"))
            })?;
            sqlx::query("INSERT INTO queue_entries (position, username) VALUES (?, ?)")
                .bind(position)
                .bind(&entry.username)
                .execute(&mut *tx)
                .await
                .map_err(|e| unavailable("store queue entry", &e))?;
        }

        tx.commit()
            .await
            .map_err(|e| unavailable("commit state", &e))
    }

    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Result<()> {
        sqlx::query(sql)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| unavailable("run statement", &e))
    }
}

#[async_trait::async_trait]
impl UserLedger for SqliteLedger {
    async fn get(&self, username: &str) -> Result<UserRecord> {
        sqlx::query("SELECT username, wins, losses FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("query user", &e))?
            .map_or_else(
                || Err(Error::NotFound(username.to_string())),
                |row| parse_user_row(&row),
            )
    }

    async fn put(&self, record: &UserRecord) -> Result<()> {
        let result = sqlx::query("UPDATE users SET wins = ?, losses = ? WHERE username = ?")
            .bind(i64::from(record.wins))
            .bind(i64::from(record.losses))
            .bind(&record.username)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("update user", &e))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(record.username.clone()));
        }
        Ok(())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation())
                {
                    Error::DuplicateUsername(username.to_string())
                } else {
                    unavailable("create user", &e)
                }
            })?;

        Ok(UserRecord::new(username))
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        sqlx::query("SELECT username, wins, losses FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("list users", &e))?
            .iter()
            .map(parse_user_row)
            .collect()
    }
}

// === IMPERATIVE SHELL (Database Side Effects) ===

async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| unavailable("initialize schema", &e))?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(CURRENT_SCHEMA_VERSION)
        .execute(pool)
        .await
        .map_err(|e| unavailable("set schema version", &e))?;

    Ok(())
}

async fn check_schema_version(pool: &SqlitePool) -> Result<()> {
    let version: Option<i64> = sqlx::query("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .map_err(|e| unavailable("read schema version", &e))?
        .map(|row| {
            row.try_get("version")
                .map_err(|e| unavailable("parse schema version", &e))
        })
        .transpose()?;

    match version {
        Some(CURRENT_SCHEMA_VERSION) => Ok(()),
        Some(v) => Err(Error::service_unavailable(format!(
            "Schema version mismatch: database has version {v}, but tableq expects version {CURRENT_SCHEMA_VERSION}"
        ))),
        None => Err(Error::service_unavailable(
            "Schema version not found in database. The database may be corrupted.",
        )),
    }
}

// === PURE FUNCTIONS (Row Mapping) ===

fn parse_user_row(row: &SqliteRow) -> Result<UserRecord> {
    let username: String = row
        .try_get("username")
        .map_err(|e| unavailable("read username", &e))?;
    let wins: i64 = row
        .try_get("wins")
        .map_err(|e| unavailable("read wins", &e))?;
    let losses: i64 = row
        .try_get("losses")
        .map_err(|e| unavailable("read losses", &e))?;

    let wins = u32::try_from(wins)
        .map_err(|e| Error::service_unavailable(format!("Stored wins out of range: {e}")))?;
    let losses = u32::try_from(losses)
        .map_err(|e| Error::service_unavailable(format!("Stored losses out of range: {e}")))?;

    Ok(UserRecord::with_counts(username, wins, losses))
}

fn parse_queue_row(row: &SqliteRow) -> Result<QueueEntry> {
    let username: String = row
        .try_get("username")
        .map_err(|e| unavailable("read queued username", &e))?;
    let position: i64 = row
        .try_get("position")
        .map_err(|e| unavailable("read queue position", &e))?;
    let position = usize::try_from(position)
        .map_err(|e| Error::invalid_config(format!("Stored queue position invalid: {e}")))?;

    Ok(QueueEntry { username, position })
}

fn unavailable(action: &str, e: &sqlx::Error) -> Error {
    Error::service_unavailable(format!("Failed to {action}: {e}"))
}
