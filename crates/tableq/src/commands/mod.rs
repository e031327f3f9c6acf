//! Command implementations for the tableq CLI
//!
//! Each command runs against a [`Context`]: the loaded configuration, the
//! `SQLite` store and a [`Table`] restored from the stored queue.
//!
//! Commands that write state take [`Context::exclusive`] first. That holds
//! the state lock, re-reads the queue, and keeps both until
//! [`Context::persist`] has committed and the guard is dropped.

pub mod game;
pub mod leaderboard;
pub mod queue;
pub mod users;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use serde::Serialize;
use tableq_core::{AdminCapability, Config, Identity, IdentityProvider, Table, TokenRegistry};

use crate::{
    db::SqliteLedger,
    lock::{self, LockOptions, StateLock},
    staging::StagedLedger,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Structured, machine-readable
    Json,
    /// Terminal-friendly
    #[default]
    Human,
}

impl OutputFormat {
    #[must_use]
    pub const fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human
        }
    }

    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Everything a command needs, opened once per invocation.
pub struct Context {
    config: Config,
    store: Arc<SqliteLedger>,
    staged: Arc<StagedLedger>,
    lock_path: PathBuf,
    table: Table,
    identities: TokenRegistry,
    token: Option<String>,
    format: OutputFormat,
}

impl Context {
    /// Open the state database and restore the waitlist from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the stored
    /// queue is corrupt.
    pub async fn open(config: Config, token: Option<String>, format: OutputFormat) -> Result<Self> {
        let state_db = Path::new(&config.state_db);
        let store = Arc::new(SqliteLedger::open(state_db).await?);
        let queue = store.load_queue().await?;
        let staged = Arc::new(StagedLedger::new(store.clone()));
        let table = Table::new(staged.clone())
            .with_queue(queue)
            .with_policy(config.outcome.missing_record);
        let identities = TokenRegistry::new(&config.identity.tokens);

        tracing::debug!(
            state_db = %config.state_db,
            tokens = identities.len(),
            "context opened"
        );

        Ok(Self {
            lock_path: lock::lock_path_for(state_db),
            config,
            store,
            staged,
            table,
            identities,
            token,
            format,
        })
    }

    pub const fn table(&self) -> &Table {
        &self.table
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Verify the caller's token.
    pub async fn caller(&self) -> tableq_core::Result<Identity> {
        self.identities
            .verify(self.token.as_deref().unwrap_or_default())
            .await
    }

    /// Verify the caller's token and require the admin capability.
    pub async fn admin(&self) -> tableq_core::Result<AdminCapability> {
        self.caller().await?.admin()
    }

    /// Take the state lock and re-read the stored queue under it.
    ///
    /// Hold the returned guard until [`Context::persist`] has run, so no
    /// other invocation can load or store the queue in between.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock stays busy past its retries or the
    /// stored queue cannot be read.
    pub async fn exclusive(&self) -> tableq_core::Result<StateLock> {
        let guard = lock::acquire(&self.lock_path, &LockOptions::default()).await?;
        self.table.restore_queue(self.store.load_queue().await?).await;
        Ok(guard)
    }

    /// Commit staged stats and the current waitlist in one transaction.
    pub async fn persist(&self) -> tableq_core::Result<()> {
        let records = self.staged.take_pending().await;
        let entries = self.table.entries().await;
        self.store.commit_state(&records, &entries).await
    }
}

/// Print a value as pretty JSON.
pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Truncate a string to a maximum length
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    } else {
        s.to_string()
    }
}
