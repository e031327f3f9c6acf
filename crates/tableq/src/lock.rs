//! Cross-process lock around the state database
//!
//! Every command that reads the queue and writes it back runs while holding
//! an exclusive advisory lock on a file next to the database. Two `tableq`
//! processes therefore never interleave their load, mutate and store steps.
//!
//! The lock is released when the [`StateLock`] is dropped, and by the OS if
//! the process dies while holding it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use fs2::FileExt;
use tableq_core::{Error, Result};

/// Held exclusive lock. Released on drop.
#[derive(Debug)]
pub struct StateLock {
    file: File,
    lock_path: PathBuf,
}

impl StateLock {
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.lock_path.display(), error = %e, "failed to release state lock");
        } else {
            tracing::debug!(path = %self.lock_path.display(), "released state lock");
        }
    }
}

/// Retry behaviour while another process holds the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry, doubled each attempt
    pub base_delay_ms: u64,
    /// Upper bound on a single delay
    pub max_delay_ms: u64,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            max_retries: 12,
            base_delay_ms: 10,
            max_delay_ms: 2000,
        }
    }
}

impl LockOptions {
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub const fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    fn delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms))
    }
}

/// Lock file used for a given state database: `<db>.lock`.
pub fn lock_path_for(state_db: &Path) -> PathBuf {
    let mut name = state_db.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Acquire the exclusive lock at `lock_path`, retrying with exponential
/// backoff while another holder has it.
///
/// # Errors
///
/// Returns `Error::Io` if the lock file cannot be opened and
/// `Error::ServiceUnavailable` if the lock is still held after the last
/// retry.
pub async fn acquire(lock_path: &Path, options: &LockOptions) -> Result<StateLock> {
    let file = tokio::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .await
        .map_err(|e| {
            Error::io_error(format!(
                "Failed to open lock file '{}': {e}",
                lock_path.display()
            ))
        })?
        .into_std()
        .await;

    let mut attempt = 0;
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(path = %lock_path.display(), attempt, "acquired state lock");
                return Ok(StateLock {
                    file,
                    lock_path: lock_path.to_path_buf(),
                });
            }
            Err(e) if is_contended(&e) && attempt < options.max_retries => {
                let delay = options.delay(attempt);
                tracing::debug!(
                    path = %lock_path.display(),
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "state lock busy, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) if is_contended(&e) => {
                return Err(Error::service_unavailable(format!(
                    "State database is busy: lock '{}' still held after {} attempts",
                    lock_path.display(),
                    options.max_retries + 1
                )));
            }
            Err(e) => {
                return Err(Error::io_error(format!(
                    "Failed to lock '{}': {e}",
                    lock_path.display()
                )));
            }
        }
    }
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
