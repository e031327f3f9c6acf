//! Write-buffering ledger for one command invocation
//!
//! Record updates made while a command runs are held in memory and reach
//! the database only through [`SqliteLedger::commit_state`], in the same
//! transaction as the queue snapshot. A failed commit therefore leaves both
//! the stats and the stored queue as they were.

use std::{collections::BTreeMap, sync::Arc};

use tableq_core::{Result, UserLedger, UserRecord};
use tokio::sync::Mutex;

use crate::db::SqliteLedger;

/// Ledger whose reads see pending writes and whose writes wait for a commit.
#[derive(Debug)]
pub struct StagedLedger {
    store: Arc<SqliteLedger>,
    pending: Mutex<BTreeMap<String, UserRecord>>,
}

impl StagedLedger {
    #[must_use]
    pub fn new(store: Arc<SqliteLedger>) -> Self {
        Self {
            store,
            pending: Mutex::new(BTreeMap::new()),
        }
    }

    /// Drain the buffered records, ordered by username.
    pub async fn take_pending(&self) -> Vec<UserRecord> {
        std::mem::take(&mut *self.pending.lock().await)
            .into_values()
            .collect()
    }
}

#[async_trait::async_trait]
impl UserLedger for StagedLedger {
    async fn get(&self, username: &str) -> Result<UserRecord> {
        if let Some(record) = self.pending.lock().await.get(username) {
            return Ok(record.clone());
        }
        self.store.get(username).await
    }

    async fn put(&self, record: &UserRecord) -> Result<()> {
        let mut pending = self.pending.lock().await;
        if !pending.contains_key(&record.username) {
            self.store.get(&record.username).await?;
        }
        pending.insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        self.store.create(username, password_hash).await
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let pending = self.pending.lock().await;
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .map(|stored| pending.get(&stored.username).cloned().unwrap_or(stored))
            .collect())
    }
}
