//! User Ledger - per-user win/loss record and its persistence boundary.
//!
//! The ledger itself is an external collaborator. This module defines the
//! record shape, the `UserLedger` trait the core talks to, and an in-memory
//! implementation used by tests and embedders. The CLI crate provides a
//! SQLite implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// USER RECORD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Durable per-user statistics.
///
/// `win_ratio` is `wins / (wins + losses)` once at least one game has been
/// played and `0.0` before that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub win_ratio: f64,
}

impl UserRecord {
    /// A record with no games played.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            wins: 0,
            losses: 0,
            win_ratio: 0.0,
        }
    }

    /// Build a record from stored counts, deriving the ratio.
    #[must_use]
    pub fn with_counts(username: impl Into<String>, wins: u32, losses: u32) -> Self {
        Self {
            username: username.into(),
            wins,
            losses,
            win_ratio: win_ratio(wins, losses),
        }
    }

    #[must_use]
    pub const fn games_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Copy of this record with one more win.
    #[must_use]
    pub fn record_win(&self) -> Self {
        Self::with_counts(self.username.clone(), self.wins.saturating_add(1), self.losses)
    }

    /// Copy of this record with one more loss.
    #[must_use]
    pub fn record_loss(&self) -> Self {
        Self::with_counts(self.username.clone(), self.wins, self.losses.saturating_add(1))
    }
}

/// Wins over games played, `0.0` when no games have been played.
#[must_use]
pub fn win_ratio(wins: u32, losses: u32) -> f64 {
    if wins == 0 && losses == 0 {
        return 0.0;
    }
    f64::from(wins) / (f64::from(wins) + f64::from(losses))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LEDGER TRAIT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Persistence boundary for user records.
///
/// Implementations report a missing user as `Error::NotFound` and any
/// backend failure as `Error::ServiceUnavailable`. Calls are single
/// round-trips with no internal retry.
#[async_trait::async_trait]
pub trait UserLedger: Send + Sync {
    /// Fetch one record by its case-sensitive username.
    async fn get(&self, username: &str) -> Result<UserRecord>;

    /// Overwrite the statistics of an existing record.
    async fn put(&self, record: &UserRecord) -> Result<()>;

    /// Create a fresh record. `password_hash` is stored opaquely.
    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord>;

    /// All records, in no particular order.
    async fn list(&self) -> Result<Vec<UserRecord>>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IN-MEMORY LEDGER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
struct StoredUser {
    record: UserRecord,
    password_hash: String,
}

/// Ledger held entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a ledger with records, bypassing registration rules.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records
            .into_iter()
            .map(|record| {
                (
                    record.username.clone(),
                    StoredUser {
                        record,
                        password_hash: String::new(),
                    },
                )
            })
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Stored credential for a user, if any.
    pub async fn password_hash(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .await
            .get(username)
            .map(|u| u.password_hash.clone())
    }
}

#[async_trait::async_trait]
impl UserLedger for InMemoryLedger {
    async fn get(&self, username: &str) -> Result<UserRecord> {
        self.users
            .read()
            .await
            .get(username)
            .map(|u| u.record.clone())
            .ok_or_else(|| Error::NotFound(username.to_string()))
    }

    async fn put(&self, record: &UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(&record.username)
            .ok_or_else(|| Error::NotFound(record.username.clone()))?;
        stored.record = UserRecord::with_counts(record.username.clone(), record.wins, record.losses);
        Ok(())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(Error::DuplicateUsername(username.to_string()));
        }
        let record = UserRecord::new(username);
        users.insert(
            username.to_string(),
            StoredUser {
                record: record.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .map(|u| u.record.clone())
            .collect())
    }
}
