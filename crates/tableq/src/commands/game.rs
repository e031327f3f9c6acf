//! Game report command
//!
//! Applies a reported result through the core workflow under the state
//! lock, then commits the new stats and the queue without the loser in one
//! transaction.

use anyhow::Result;
use tableq_core::UserRecord;

use super::{emit_json, Context};

/// Report options
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub winner: String,
    pub loser: String,
}

/// Run `game report`
///
/// # Errors
///
/// Returns an error if:
/// - The caller's token is missing or unknown
/// - The caller is not seated at the table
/// - The report is malformed or names players not at the table
/// - A ledger record is missing under the `reject` policy
/// - The state lock stays busy or the store cannot be written; in that
///   case neither the stats nor the stored queue change
pub async fn report(ctx: &Context, options: &ReportOptions) -> Result<()> {
    let caller = ctx.caller().await?;
    let _lock = ctx.exclusive().await?;
    let outcome = ctx
        .table()
        .report_game(&caller, &options.winner, &options.loser)
        .await?;

    ctx.persist().await?;

    if ctx.format().is_json() {
        return emit_json(&outcome);
    }

    println!("Recorded: {} beat {}", options.winner, options.loser);
    for record in [&outcome.winner, &outcome.loser].into_iter().flatten() {
        println!("  {}", summary(record));
    }
    for name in &outcome.skipped {
        println!("  {name}: no ledger record, stats not updated");
    }
    println!("Queue: {}", outcome.queue.join(", "));
    Ok(())
}

fn summary(record: &UserRecord) -> String {
    format!(
        "{}: {}W {}L ({:.3})",
        record.username, record.wins, record.losses, record.win_ratio
    )
}
