//! Queue Engine - the single owner of the shared waitlist.
//!
//! All mutations are serialized through one async mutex, so no two
//! read-modify-write sequences can interleave and every read observes a
//! queue whose positions are `1..=N`.
//!
//! The game outcome workflow needs to hold the queue across ledger writes;
//! it does so through [`QueueEngine::lock`], which is crate-private.

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::{
    queue::{QueueEntry, WaitQueue},
    Result,
};

/// Mutex-guarded waitlist.
#[derive(Debug, Default)]
pub struct QueueEngine {
    queue: Mutex<WaitQueue>,
}

impl QueueEngine {
    /// Create an engine with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that starts from an existing queue.
    #[must_use]
    pub fn from_queue(queue: WaitQueue) -> Self {
        Self {
            queue: Mutex::new(queue),
        }
    }

    /// Usernames by ascending position.
    pub async fn snapshot(&self) -> Vec<String> {
        self.queue.lock().await.snapshot()
    }

    /// Entries with their positions.
    pub async fn entries(&self) -> Vec<QueueEntry> {
        self.queue.lock().await.entries().to_vec()
    }

    /// First `n` usernames by position.
    pub async fn top_n(&self, n: usize) -> Vec<String> {
        self.queue.lock().await.top_n(n)
    }

    pub async fn position_of(&self, username: &str) -> Option<usize> {
        self.queue.lock().await.position_of(username)
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.queue.lock().await.is_empty()
    }

    /// Append at `max(position) + 1`.
    pub async fn enqueue(&self, username: &str) -> Result<usize> {
        let position = self.queue.lock().await.enqueue(username)?;
        debug!(username, position, "enqueued");
        Ok(position)
    }

    /// Remove a username and close the gap.
    pub async fn remove_by_name(&self, username: &str) -> Result<QueueEntry> {
        let removed = self.queue.lock().await.remove_by_name(username)?;
        debug!(username, position = removed.position, "removed from queue");
        Ok(removed)
    }

    /// Remove position 1 and return its username.
    pub async fn remove_top(&self) -> Result<String> {
        let removed = self.queue.lock().await.remove_top()?;
        debug!(username = %removed, "removed top of queue");
        Ok(removed)
    }

    /// Remove everyone. Returns the number removed.
    pub async fn clear(&self) -> usize {
        let removed = self.queue.lock().await.clear();
        debug!(removed, "queue cleared");
        removed
    }

    /// Insert at a 1-based position, shifting later entries back.
    pub async fn insert_at_position(&self, username: &str, position: usize) -> Result<()> {
        self.queue.lock().await.insert_at(username, position)?;
        debug!(username, position, "inserted into queue");
        Ok(())
    }

    /// Swap in a queue re-read from storage.
    pub async fn replace(&self, queue: WaitQueue) {
        *self.queue.lock().await = queue;
    }

    /// Exclusive access for multi-step units of work.
    pub(crate) async fn lock(&self) -> MutexGuard<'_, WaitQueue> {
        self.queue.lock().await
    }
}
