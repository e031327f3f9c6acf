//! Leaderboard projection over ledger records.

use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;

use crate::ledger::UserRecord;

/// One ranked line of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub rank: usize,
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub win_ratio: f64,
}

/// Rank records by win ratio, then wins, both descending.
///
/// Full ties fall back to username order so the output is stable.
/// `limit` of `None` or `Some(0)` returns every row.
#[must_use]
pub fn project(records: Vec<UserRecord>, limit: Option<usize>) -> Vec<LeaderboardRow> {
    let take = limit.filter(|n| *n > 0).unwrap_or(usize::MAX);

    records
        .into_iter()
        .sorted_by(ranking)
        .take(take)
        .enumerate()
        .map(|(idx, r)| LeaderboardRow {
            rank: idx + 1,
            username: r.username,
            wins: r.wins,
            losses: r.losses,
            win_ratio: r.win_ratio,
        })
        .collect()
}

fn ranking(a: &UserRecord, b: &UserRecord) -> Ordering {
    b.win_ratio
        .total_cmp(&a.win_ratio)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.username.cmp(&b.username))
}
