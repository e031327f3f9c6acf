//! Table - the operations the boundary layer calls.
//!
//! Ordinary callers pass their verified [`Identity`] and can only act on
//! themselves. Administrative mutations take an [`AdminCapability`].

use std::sync::Arc;

use tracing::info;

use crate::{
    engine::QueueEngine,
    identity::{AdminCapability, Identity},
    leaderboard::{self, LeaderboardRow},
    ledger::{UserLedger, UserRecord},
    outcome::{GameOutcome, GameReport, MissingRecordPolicy},
    queue::{QueueEntry, WaitQueue, TABLE_SEATS},
    registration, Result,
};

/// Shared waitlist plus the ledger it reports into.
pub struct Table {
    queue: QueueEngine,
    ledger: Arc<dyn UserLedger>,
    policy: MissingRecordPolicy,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("queue", &self.queue)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// A table with an empty queue and the default missing-record policy.
    #[must_use]
    pub fn new(ledger: Arc<dyn UserLedger>) -> Self {
        Self {
            queue: QueueEngine::new(),
            ledger,
            policy: MissingRecordPolicy::default(),
        }
    }

    /// Start from a restored queue.
    #[must_use]
    pub fn with_queue(mut self, queue: WaitQueue) -> Self {
        self.queue = QueueEngine::from_queue(queue);
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: MissingRecordPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> MissingRecordPolicy {
        self.policy
    }

    /// Replace the in-memory waitlist, e.g. after re-reading it from storage
    /// under a lock another process may have written through.
    pub async fn restore_queue(&self, queue: WaitQueue) {
        self.queue.replace(queue).await;
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // QUEUE READS
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub async fn snapshot(&self) -> Vec<String> {
        self.queue.snapshot().await
    }

    pub async fn entries(&self) -> Vec<QueueEntry> {
        self.queue.entries().await
    }

    pub async fn top_n(&self, n: usize) -> Vec<String> {
        self.queue.top_n(n).await
    }

    /// The players currently at the table.
    pub async fn at_table(&self) -> Vec<String> {
        self.queue.top_n(TABLE_SEATS).await
    }

    pub async fn position_of(&self, username: &str) -> Option<usize> {
        self.queue.position_of(username).await
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // QUEUE MUTATIONS
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Join the back of the queue as yourself.
    pub async fn join(&self, caller: &Identity) -> Result<usize> {
        self.queue.enqueue(caller.username()).await
    }

    pub async fn admin_remove(&self, admin: &AdminCapability, username: &str) -> Result<QueueEntry> {
        let removed = self.queue.remove_by_name(username).await?;
        info!(actor = admin.actor(), username, "admin removed player");
        Ok(removed)
    }

    pub async fn admin_remove_top(&self, admin: &AdminCapability) -> Result<String> {
        let removed = self.queue.remove_top().await?;
        info!(actor = admin.actor(), username = %removed, "admin removed top of queue");
        Ok(removed)
    }

    pub async fn admin_clear(&self, admin: &AdminCapability) -> usize {
        let removed = self.queue.clear().await;
        info!(actor = admin.actor(), removed, "admin cleared queue");
        removed
    }

    pub async fn admin_insert(
        &self,
        admin: &AdminCapability,
        username: &str,
        position: usize,
    ) -> Result<()> {
        self.queue.insert_at_position(username, position).await?;
        info!(actor = admin.actor(), username, position, "admin inserted player");
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // GAME OUTCOMES
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Report a finished game as one of the two seated players.
    ///
    /// The queue stays locked from validation until the loser is gone, so
    /// concurrent readers never see stats and queue out of step.
    pub async fn report_game(
        &self,
        reporter: &Identity,
        winner: &str,
        loser: &str,
    ) -> Result<GameOutcome> {
        let mut queue = self.queue.lock().await;
        let validated =
            GameReport::new(reporter.username(), winner, loser).validate(&queue.at_table())?;
        validated
            .apply(self.ledger.as_ref(), &mut queue, self.policy)
            .await
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // LEDGER VIEWS
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Ranked statistics for every registered user.
    pub async fn leaderboard(&self, limit: Option<usize>) -> Result<Vec<LeaderboardRow>> {
        let records = self.ledger.list().await?;
        Ok(leaderboard::project(records, limit))
    }

    /// The caller's own record.
    pub async fn profile(&self, caller: &Identity) -> Result<UserRecord> {
        self.ledger.get(caller.username()).await
    }

    /// Every registered username, sorted.
    pub async fn list_users(&self, _admin: &AdminCapability) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .ledger
            .list()
            .await?
            .into_iter()
            .map(|r| r.username)
            .collect();
        names.sort();
        Ok(names)
    }

    /// Add a user to the ledger. The credential arrives already hashed.
    pub async fn register(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        registration::validate_username(username)?;
        let record = self.ledger.create(username, password_hash).await?;
        info!(username, "user registered");
        Ok(record)
    }
}
