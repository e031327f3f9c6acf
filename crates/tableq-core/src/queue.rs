//! Ordered waitlist with contiguous 1-based positions.
//!
//! `WaitQueue` is the plain data structure: no I/O, no async, no locking.
//! Every mutating method validates first and only then touches the entries,
//! so a failed call leaves the queue exactly as it was. Reindexing happens
//! inside the same method as the removal or insertion it belongs to.
//!
//! Shared access goes through [`crate::engine::QueueEngine`], which owns a
//! `WaitQueue` behind a mutex.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of players occupying the table at once.
pub const TABLE_SEATS: usize = 2;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// QUEUE ENTRY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A username waiting for the table, with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub username: String,
    pub position: usize,
}

impl QueueEntry {
    #[must_use]
    pub fn new(username: impl Into<String>, position: usize) -> Self {
        Self {
            username: username.into(),
            position,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WAIT QUEUE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The waitlist. Entries are kept sorted by position and positions are
/// always exactly `1..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitQueue {
    entries: Vec<QueueEntry>,
    members: HashSet<String>,
}

impl WaitQueue {
    /// Create a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from stored entries.
    ///
    /// Entries may arrive in any order but their positions must be exactly
    /// `1..=N` with no duplicate usernames. Nothing is repaired.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first violation found.
    pub fn from_entries(mut entries: Vec<QueueEntry>) -> Result<Self> {
        entries.sort_by_key(|e| e.position);

        let mut members = HashSet::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if entry.username.is_empty() {
                return Err(Error::invalid_config("stored queue entry has empty username"));
            }
            if entry.position != idx + 1 {
                return Err(Error::invalid_config(format!(
                    "stored queue positions are not contiguous: expected {} but found {} for '{}'",
                    idx + 1,
                    entry.position,
                    entry.username
                )));
            }
            if !members.insert(entry.username.clone()) {
                return Err(Error::invalid_config(format!(
                    "stored queue lists '{}' more than once",
                    entry.username
                )));
            }
        }

        Ok(Self { entries, members })
    }

    /// Number of waiting entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending position order.
    #[must_use]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Usernames in ascending position order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.username.clone()).collect()
    }

    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.members.contains(username)
    }

    /// 1-based position of a username, if queued.
    #[must_use]
    pub fn position_of(&self, username: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.username == username)
            .map(|e| e.position)
    }

    /// The first `n` usernames by position (fewer if the queue is shorter).
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<String> {
        self.entries
            .iter()
            .take(n)
            .map(|e| e.username.clone())
            .collect()
    }

    /// The usernames currently at the table.
    #[must_use]
    pub fn at_table(&self) -> Vec<String> {
        self.top_n(TABLE_SEATS)
    }

    /// Append a username at the back of the queue.
    ///
    /// Returns the assigned position.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUsername` if the username is empty
    /// - `Error::AlreadyQueued` if the username is already waiting
    pub fn enqueue(&mut self, username: &str) -> Result<usize> {
        self.check_insertable(username)?;

        let position = self.entries.last().map_or(1, |last| last.position + 1);
        self.entries.push(QueueEntry::new(username, position));
        self.members.insert(username.to_string());
        Ok(position)
    }

    /// Remove a username wherever it waits and close the gap behind it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotQueued` if the username is not waiting.
    pub fn remove_by_name(&mut self, username: &str) -> Result<QueueEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.username == username)
            .ok_or_else(|| Error::NotQueued(username.to_string()))?;
        Ok(self.remove_at(idx))
    }

    /// Remove the entry at position 1.
    ///
    /// # Errors
    ///
    /// Returns `Error::QueueEmpty` if nothing is waiting.
    pub fn remove_top(&mut self) -> Result<String> {
        if self.entries.is_empty() {
            return Err(Error::QueueEmpty);
        }
        Ok(self.remove_at(0).username)
    }

    /// Drop every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.members.clear();
        removed
    }

    /// Place a username at `position`, shifting everyone at or behind it
    /// back by one.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUsername` if the username is empty
    /// - `Error::AlreadyQueued` if the username is already waiting
    /// - `Error::InvalidPosition` unless `1 <= position <= len + 1`
    pub fn insert_at(&mut self, username: &str, position: usize) -> Result<()> {
        self.check_insertable(username)?;

        let max = self.entries.len() + 1;
        if position == 0 || position > max {
            return Err(Error::InvalidPosition { position, max });
        }

        let idx = position - 1;
        for entry in &mut self.entries[idx..] {
            entry.position += 1;
        }
        self.entries.insert(idx, QueueEntry::new(username, position));
        self.members.insert(username.to_string());
        Ok(())
    }

    /// Check queue consistency (for property testing).
    ///
    /// Returns true if positions are exactly `1..=len` in order and the
    /// membership index matches the entries with no duplicates.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let contiguous = self
            .entries
            .iter()
            .enumerate()
            .all(|(idx, e)| e.position == idx + 1);

        let unique: HashSet<&str> = self.entries.iter().map(|e| e.username.as_str()).collect();

        contiguous
            && unique.len() == self.entries.len()
            && self.members.len() == self.entries.len()
            && unique.iter().all(|u| self.members.contains(*u))
    }

    fn check_insertable(&self, username: &str) -> Result<()> {
        if username.is_empty() {
            return Err(Error::InvalidUsername("username cannot be empty".into()));
        }
        if self.members.contains(username) {
            return Err(Error::AlreadyQueued(username.to_string()));
        }
        Ok(())
    }

    fn remove_at(&mut self, idx: usize) -> QueueEntry {
        let removed = self.entries.remove(idx);
        for entry in &mut self.entries[idx..] {
            entry.position -= 1;
        }
        self.members.remove(&removed.username);
        removed
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
