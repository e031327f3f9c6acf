//! Queue command implementation
//!
//! Shows and mutates the waitlist. Every action runs under the state lock
//! against the freshly stored queue, and a successful mutation is written
//! back before the lock is released.

use anyhow::Result;
use serde::Serialize;
use tableq_core::{QueueEntry, TABLE_SEATS};

use super::{emit_json, truncate, Context};

/// Queue subcommands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueAction {
    Show,
    Join,
    Remove { username: String },
    RemoveTop,
    Clear,
    Insert { username: String, position: usize },
}

#[derive(Debug, Serialize)]
struct QueueView<'a> {
    entries: &'a [QueueEntry],
    at_table: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct MutationView {
    message: String,
    queue: Vec<QueueEntry>,
}

/// Run a queue subcommand
///
/// # Errors
///
/// Returns an error if:
/// - The caller's token is missing or unknown
/// - An admin action is attempted without the admin grant
/// - The queue rejects the mutation (already queued, not queued, empty,
///   position out of range)
/// - The state lock stays busy or the store cannot be written
pub async fn run(ctx: &Context, action: QueueAction) -> Result<()> {
    let _lock = ctx.exclusive().await?;
    let message = match action {
        QueueAction::Show => {
            ctx.caller().await?;
            let entries = ctx.table().entries().await;
            return render_queue(ctx, &entries);
        }
        QueueAction::Join => {
            let caller = ctx.caller().await?;
            let position = ctx.table().join(&caller).await?;
            format!("Joined the queue at position {position}")
        }
        QueueAction::Remove { username } => {
            let admin = ctx.admin().await?;
            ctx.table().admin_remove(&admin, &username).await?;
            format!("Removed '{username}' from the queue")
        }
        QueueAction::RemoveTop => {
            let admin = ctx.admin().await?;
            let removed = ctx.table().admin_remove_top(&admin).await?;
            format!("Removed '{removed}' from the top of the queue")
        }
        QueueAction::Clear => {
            let admin = ctx.admin().await?;
            let removed = ctx.table().admin_clear(&admin).await;
            format!("Cleared the queue ({removed} removed)")
        }
        QueueAction::Insert { username, position } => {
            let admin = ctx.admin().await?;
            ctx.table().admin_insert(&admin, &username, position).await?;
            format!("Inserted '{username}' at position {position}")
        }
    };

    ctx.persist().await?;

    if ctx.format().is_json() {
        emit_json(&MutationView {
            message,
            queue: ctx.table().entries().await,
        })
    } else {
        println!("{message}");
        Ok(())
    }
}

fn render_queue(ctx: &Context, entries: &[QueueEntry]) -> Result<()> {
    if ctx.format().is_json() {
        return emit_json(&QueueView {
            entries,
            at_table: entries
                .iter()
                .take(TABLE_SEATS)
                .map(|e| e.username.as_str())
                .collect(),
        });
    }

    if entries.is_empty() {
        println!("Queue is empty");
        return Ok(());
    }

    println!("╔══════════════════════════════════════════╗");
    println!("║ WAITLIST                                 ║");
    println!("╠══════════════════════════════════════════╣");
    println!("║ Pos │ Player                    │ Table  ║");
    println!("╠══════════════════════════════════════════╣");
    for entry in entries {
        let seat = if entry.position <= TABLE_SEATS {
            "seated"
        } else {
            "-"
        };
        println!(
            "║ {:>3} │ {:25} │ {:6} ║",
            entry.position,
            truncate(&entry.username, 25),
            seat
        );
    }
    println!("╚══════════════════════════════════════════╝");
    Ok(())
}
