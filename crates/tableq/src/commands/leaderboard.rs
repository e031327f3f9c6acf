//! Leaderboard command

use anyhow::Result;
use tableq_core::LeaderboardRow;

use super::{emit_json, truncate, Context};

/// Run `leaderboard`
///
/// `limit` of `None` falls back to the configured `[leaderboard] limit`.
///
/// # Errors
///
/// Returns an error if the caller's token is invalid or the ledger cannot
/// be read.
pub async fn run(ctx: &Context, limit: Option<usize>) -> Result<()> {
    ctx.caller().await?;
    let limit = limit.unwrap_or(ctx.config().leaderboard.limit);
    let rows = ctx.table().leaderboard(Some(limit)).await?;

    if ctx.format().is_json() {
        return emit_json(&rows);
    }
    render(&rows);
    Ok(())
}

fn render(rows: &[LeaderboardRow]) {
    if rows.is_empty() {
        println!("No registered players");
        return;
    }

    println!("╔═══════════════════════════════════════════════════════╗");
    println!("║ LEADERBOARD                                           ║");
    println!("╠═══════════════════════════════════════════════════════╣");
    println!("║ #    │ Player               │ Wins │ Losses │ Ratio  ║");
    println!("╠═══════════════════════════════════════════════════════╣");
    for row in rows {
        println!(
            "║ {:<4} │ {:20} │ {:>4} │ {:>6} │ {:>6.3} ║",
            row.rank,
            truncate(&row.username, 20),
            row.wins,
            row.losses,
            row.win_ratio
        );
    }
    println!("╚═══════════════════════════════════════════════════════╝");
}

#[cfg(test)]
mod tests {
    use tableq_core::{UserLedger, UserRecord};
    use tempfile::TempDir;

    use super::*;
    use crate::{commands::test_support::context_as, db::SqliteLedger};

    #[tokio::test]
    async fn test_leaderboard_reads_store() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SqliteLedger::open(&dir.path().join("state.db")).await?;
        for name in ["alice", "bob"] {
            store.create(name, "h").await?;
        }
        store.put(&UserRecord::with_counts("bob", 2, 1)).await?;

        let ctx = context_as(&dir, Some("alice-token")).await?;
        run(&ctx, Some(1)).await?;

        let rows = ctx.table().leaderboard(None).await?;
        assert_eq!(rows[0].username, "bob");
        assert_eq!(rows[1].username, "alice");
        Ok(())
    }
}
