//! Game Outcome Workflow.
//!
//! A report moves `Submitted -> Validated -> Applied`, or stops at
//! `Rejected` with one of the validation errors. Each report is judged
//! against the queue as it is right now; nothing is remembered between
//! reports.
//!
//! Validation is pure and runs before anything is written. Application
//! runs while the caller holds the queue lock, so queue readers see either
//! the state before the report or the state after it, never a mix.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{error, info, warn};

use crate::{
    ledger::{UserLedger, UserRecord},
    queue::WaitQueue,
    Error, Result,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POLICY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What to do when a player named in a valid report has no ledger record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MissingRecordPolicy {
    /// Apply the side that resolves, warn about the other.
    #[default]
    Skip,
    /// Fail the report with `Error::NotFound` before writing anything.
    Reject,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A submitted game result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub reporter: String,
    pub winner: String,
    pub loser: String,
}

/// A report that passed every check against the current table.
///
/// Only [`GameReport::validate`] can produce one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedReport {
    winner: String,
    loser: String,
}

/// Result of an applied report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameOutcome {
    /// Winner's record after the update, `None` if it was skipped.
    pub winner: Option<UserRecord>,
    /// Loser's record after the update, `None` if it was skipped.
    pub loser: Option<UserRecord>,
    /// Usernames whose ledger update was skipped.
    pub skipped: Vec<String>,
    /// Queue after the loser left.
    pub queue: Vec<String>,
}

impl GameReport {
    #[must_use]
    pub fn new(
        reporter: impl Into<String>,
        winner: impl Into<String>,
        loser: impl Into<String>,
    ) -> Self {
        Self {
            reporter: reporter.into(),
            winner: winner.into(),
            loser: loser.into(),
        }
    }

    /// Check the report against the players at the table.
    ///
    /// Checks run in order and the first failure wins:
    /// 1. the reporter is at the table (`NotEligible`)
    /// 2. winner and loser are present and distinct (`InvalidReport`)
    /// 3. winner and loser are both at the table (`PlayersNotAtTable`)
    pub fn validate(self, at_table: &[String]) -> Result<ValidatedReport> {
        let seated = |name: &str| at_table.iter().any(|u| u == name);

        if !seated(&self.reporter) {
            return Err(Error::NotEligible(self.reporter));
        }
        if self.winner.is_empty() || self.loser.is_empty() {
            return Err(Error::InvalidReport(
                "winner and loser must be specified".into(),
            ));
        }
        if self.winner == self.loser {
            return Err(Error::InvalidReport(
                "winner and loser cannot be the same person".into(),
            ));
        }
        if !seated(&self.winner) || !seated(&self.loser) {
            return Err(Error::PlayersNotAtTable {
                winner: self.winner,
                loser: self.loser,
            });
        }

        Ok(ValidatedReport {
            winner: self.winner,
            loser: self.loser,
        })
    }
}

impl ValidatedReport {
    #[must_use]
    pub fn winner(&self) -> &str {
        &self.winner
    }

    #[must_use]
    pub fn loser(&self) -> &str {
        &self.loser
    }

    /// Write both players' stats and dequeue the loser.
    ///
    /// `queue` must be the guarded queue the report was validated against.
    /// Both records are read before anything is written. If the loser's write
    /// fails after the winner's succeeded, the winner's previous record is
    /// written back and the queue is left alone.
    pub(crate) async fn apply(
        self,
        ledger: &dyn UserLedger,
        queue: &mut WaitQueue,
        policy: MissingRecordPolicy,
    ) -> Result<GameOutcome> {
        let winner_before = load(ledger, &self.winner, policy).await?;
        let loser_before = load(ledger, &self.loser, policy).await?;

        let winner_after = winner_before.as_ref().map(UserRecord::record_win);
        let loser_after = loser_before.as_ref().map(UserRecord::record_loss);

        if let Some(record) = &winner_after {
            ledger.put(record).await?;
        }
        if let Some(record) = &loser_after {
            if let Err(e) = ledger.put(record).await {
                compensate(ledger, winner_before.as_ref()).await;
                return Err(e);
            }
        }

        queue.remove_by_name(&self.loser)?;

        let skipped: Vec<String> = [
            (winner_after.is_none(), &self.winner),
            (loser_after.is_none(), &self.loser),
        ]
        .into_iter()
        .filter(|(missing, _)| *missing)
        .map(|(_, name)| name.clone())
        .collect();

        info!(
            winner = %self.winner,
            loser = %self.loser,
            skipped = skipped.len(),
            "game applied"
        );

        Ok(GameOutcome {
            winner: winner_after,
            loser: loser_after,
            skipped,
            queue: queue.snapshot(),
        })
    }
}

async fn load(
    ledger: &dyn UserLedger,
    username: &str,
    policy: MissingRecordPolicy,
) -> Result<Option<UserRecord>> {
    match ledger.get(username).await {
        Ok(record) => Ok(Some(record)),
        Err(Error::NotFound(_)) => match policy {
            MissingRecordPolicy::Skip => {
                warn!(
                    username,
                    "queued player has no ledger record, skipping stat update"
                );
                Ok(None)
            }
            MissingRecordPolicy::Reject => Err(Error::NotFound(username.to_string())),
        },
        Err(e) => Err(e),
    }
}

async fn compensate(ledger: &dyn UserLedger, previous: Option<&UserRecord>) {
    let Some(previous) = previous else {
        return;
    };
    match ledger.put(previous).await {
        Ok(()) => warn!(
            username = %previous.username,
            "loser update failed, winner update rolled back"
        ),
        Err(e) => error!(
            username = %previous.username,
            error = %e,
            "loser update failed and winner rollback failed, ledger is inconsistent"
        ),
    }
}
