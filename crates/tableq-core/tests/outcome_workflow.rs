//! Game outcome workflow: scenarios, all-or-nothing validation, missing
//! ledger records and partial write compensation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use tableq_core::{
    Error, Identity, InMemoryLedger, MissingRecordPolicy, Result, Table, UserLedger, UserRecord,
};

// =============================================================================
// HELPERS
// =============================================================================

fn player(name: &str) -> Identity {
    Identity::new(name, false)
}

async fn seated_table(ledger: Arc<dyn UserLedger>, queue: &[&str]) -> Table {
    let table = Table::new(ledger);
    for name in queue {
        table.join(&player(name)).await.unwrap();
    }
    table
}

fn ledger_with(users: &[&str]) -> Arc<InMemoryLedger> {
    Arc::new(InMemoryLedger::with_records(
        users.iter().map(|u| UserRecord::new(*u)),
    ))
}

/// Ledger whose Nth `put` (1-based) fails; every other write goes through.
struct FlakyLedger {
    inner: InMemoryLedger,
    puts: AtomicUsize,
    fail_on: usize,
}

impl FlakyLedger {
    fn failing_on(fail_on: usize, users: &[&str]) -> Self {
        Self {
            inner: InMemoryLedger::with_records(users.iter().map(|u| UserRecord::new(*u))),
            puts: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait::async_trait]
impl UserLedger for FlakyLedger {
    async fn get(&self, username: &str) -> Result<UserRecord> {
        self.inner.get(username).await
    }

    async fn put(&self, record: &UserRecord) -> Result<()> {
        let attempt = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on {
            return Err(Error::service_unavailable("ledger write timed out"));
        }
        self.inner.put(record).await
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<UserRecord> {
        self.inner.create(username, password_hash).await
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        self.inner.list().await
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_winner_stays_loser_leaves() {
    let ledger = ledger_with(&["alice", "bob"]);
    let table = seated_table(ledger.clone(), &["alice", "bob"]).await;

    let outcome = table
        .report_game(&player("alice"), "alice", "bob")
        .await
        .unwrap();

    assert_eq!(ledger.get("alice").await.unwrap().wins, 1);
    assert_eq!(ledger.get("bob").await.unwrap().losses, 1);
    assert_eq!(table.snapshot().await, vec!["alice"]);
    assert_eq!(table.position_of("alice").await, Some(1));
    assert_eq!(outcome.queue, vec!["alice"]);
    assert!(outcome.skipped.is_empty());
}

#[tokio::test]
async fn test_next_in_line_moves_up_to_the_table() {
    let ledger = ledger_with(&["alice", "bob", "carol"]);
    let table = seated_table(ledger.clone(), &["alice", "bob", "carol"]).await;

    table
        .report_game(&player("bob"), "bob", "alice")
        .await
        .unwrap();

    assert_eq!(table.at_table().await, vec!["bob", "carol"]);
    let entries = table.entries().await;
    assert_eq!(entries[1].position, 2);
}

#[tokio::test]
async fn test_reporter_not_at_table_changes_nothing() {
    let ledger = ledger_with(&["alice", "bob", "carol"]);
    let table = seated_table(ledger.clone(), &["alice", "bob", "carol"]).await;

    let result = table.report_game(&player("carol"), "alice", "bob").await;

    assert_eq!(result, Err(Error::NotEligible("carol".into())));
    assert_eq!(table.snapshot().await, vec!["alice", "bob", "carol"]);
    for name in ["alice", "bob", "carol"] {
        let record = ledger.get(name).await.unwrap();
        assert_eq!(record.games_played(), 0);
    }
}

#[tokio::test]
async fn test_invalid_reports_change_nothing() {
    let ledger = ledger_with(&["alice", "bob", "carol"]);
    let table = seated_table(ledger.clone(), &["alice", "bob", "carol"]).await;

    let cases = [
        ("alice", "", "bob"),
        ("alice", "alice", "alice"),
        ("alice", "alice", "carol"),
        ("bob", "carol", "bob"),
    ];
    for (reporter, winner, loser) in cases {
        let result = table.report_game(&player(reporter), winner, loser).await;
        assert!(
            matches!(
                result,
                Err(Error::InvalidReport(_) | Error::PlayersNotAtTable { .. })
            ),
            "{reporter}/{winner}/{loser} gave {result:?}"
        );
    }

    assert_eq!(table.snapshot().await, vec!["alice", "bob", "carol"]);
    let total: u32 = ledger
        .list()
        .await
        .unwrap()
        .iter()
        .map(UserRecord::games_played)
        .sum();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_repeated_games_accumulate_ratio() {
    let ledger = ledger_with(&["alice", "bob", "carol", "dave", "erin"]);
    let table = seated_table(ledger.clone(), &["alice", "bob", "carol", "dave", "erin"]).await;

    // alice beats bob, carol and dave, then loses to erin
    for loser in ["bob", "carol", "dave"] {
        table
            .report_game(&player("alice"), "alice", loser)
            .await
            .unwrap();
    }
    table
        .report_game(&player("erin"), "erin", "alice")
        .await
        .unwrap();

    let alice = ledger.get("alice").await.unwrap();
    assert_eq!((alice.wins, alice.losses), (3, 1));
    assert!((alice.win_ratio - 0.75).abs() < f64::EPSILON);
    assert_eq!(table.snapshot().await, vec!["erin"]);

    let board = table.leaderboard(None).await.unwrap();
    assert_eq!(board[0].username, "erin");
    assert_eq!(board[1].username, "alice");
}

// =============================================================================
// MISSING LEDGER RECORDS
// =============================================================================

#[tokio::test]
async fn test_skip_policy_applies_what_resolves() {
    let ledger = ledger_with(&["alice"]);
    let table = seated_table(ledger.clone(), &["alice", "ghost"]).await;

    let outcome = table
        .report_game(&player("alice"), "alice", "ghost")
        .await
        .unwrap();

    assert_eq!(outcome.skipped, vec!["ghost"]);
    assert!(outcome.loser.is_none());
    assert_eq!(ledger.get("alice").await.unwrap().wins, 1);
    assert_eq!(table.snapshot().await, vec!["alice"]);
}

#[tokio::test]
async fn test_reject_policy_fails_before_any_write() {
    let ledger = ledger_with(&["alice"]);
    let table = seated_table(ledger.clone(), &["alice", "ghost"])
        .await
        .with_policy(MissingRecordPolicy::Reject);

    let result = table.report_game(&player("alice"), "alice", "ghost").await;

    assert_eq!(result, Err(Error::NotFound("ghost".into())));
    assert_eq!(ledger.get("alice").await.unwrap().wins, 0);
    assert_eq!(table.snapshot().await, vec!["alice", "ghost"]);
}

// =============================================================================
// COLLABORATOR FAILURE
// =============================================================================

#[tokio::test]
async fn test_loser_write_failure_rolls_back_winner() {
    // first put is the winner, second is the loser
    let ledger = Arc::new(FlakyLedger::failing_on(2, &["alice", "bob"]));
    let table = seated_table(ledger.clone(), &["alice", "bob"]).await;

    let result = table.report_game(&player("alice"), "alice", "bob").await;

    assert!(matches!(result, Err(Error::ServiceUnavailable(_))));
    assert_eq!(table.snapshot().await, vec!["alice", "bob"]);
    assert_eq!(ledger.inner.get("alice").await.unwrap().wins, 0);
    assert_eq!(ledger.inner.get("bob").await.unwrap().losses, 0);
    assert_eq!(ledger.puts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_winner_write_failure_changes_nothing() {
    let ledger = Arc::new(FlakyLedger::failing_on(1, &["alice", "bob"]));
    let table = seated_table(ledger.clone(), &["alice", "bob"]).await;

    let result = table.report_game(&player("bob"), "alice", "bob").await;

    assert!(matches!(result, Err(Error::ServiceUnavailable(_))));
    assert_eq!(table.snapshot().await, vec!["alice", "bob"]);
    assert_eq!(ledger.inner.get("alice").await.unwrap().wins, 0);
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_see_half_applied_report() {
    let ledger = ledger_with(&["alice", "bob", "carol"]);
    let table = Arc::new(seated_table(ledger.clone(), &["alice", "bob", "carol"]).await);

    let before = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
    let after = vec!["alice".to_string(), "carol".to_string()];

    let readers: Vec<_> = (0..16)
        .map(|_| {
            let table = Arc::clone(&table);
            tokio::spawn(async move { table.snapshot().await })
        })
        .collect();
    let reporter = {
        let table = Arc::clone(&table);
        tokio::spawn(async move { table.report_game(&player("bob"), "alice", "bob").await })
    };

    for reader in readers {
        let seen = reader.await.unwrap();
        assert!(seen == before || seen == after, "torn snapshot {seen:?}");
    }
    reporter.await.unwrap().unwrap();
    assert_eq!(table.snapshot().await, after);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_reports_apply_once() {
    let ledger = ledger_with(&["alice", "bob", "carol"]);
    let table = Arc::new(seated_table(ledger.clone(), &["alice", "bob", "carol"]).await);

    let handles: Vec<_> = ["alice", "bob"]
        .into_iter()
        .map(|reporter| {
            let table = Arc::clone(&table);
            tokio::spawn(async move { table.report_game(&player(reporter), "alice", "bob").await })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            applied += 1;
        }
    }

    // the second report sees carol seated instead of bob
    assert_eq!(applied, 1);
    assert_eq!(ledger.get("alice").await.unwrap().wins, 1);
    assert_eq!(ledger.get("bob").await.unwrap().losses, 1);
}
