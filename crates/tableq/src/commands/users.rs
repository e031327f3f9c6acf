//! User commands: registration, listing and the caller's profile

use anyhow::Result;
use serde::Serialize;

use super::{emit_json, Context};

#[derive(Debug, Serialize)]
struct UsersView<'a> {
    users: &'a [String],
}

/// Run `users register`
///
/// Registration is open: no token is needed.
///
/// # Errors
///
/// Returns an error if the username is reserved, too short or taken, or if
/// the ledger cannot be written.
pub async fn register(ctx: &Context, username: &str, password_hash: &str) -> Result<()> {
    let record = ctx.table().register(username, password_hash).await?;

    if ctx.format().is_json() {
        return emit_json(&record);
    }
    println!("Registered '{}'", record.username);
    Ok(())
}

/// Run `users list` (admin)
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the ledger cannot be
/// read.
pub async fn list(ctx: &Context) -> Result<()> {
    let admin = ctx.admin().await?;
    let users = ctx.table().list_users(&admin).await?;

    if ctx.format().is_json() {
        return emit_json(&UsersView { users: &users });
    }
    if users.is_empty() {
        println!("No registered users");
    }
    for name in &users {
        println!("{name}");
    }
    Ok(())
}

/// Run `profile`
///
/// # Errors
///
/// Returns an error if the caller's token is invalid or the caller has no
/// ledger record.
pub async fn profile(ctx: &Context) -> Result<()> {
    let caller = ctx.caller().await?;
    let record = ctx.table().profile(&caller).await?;

    if ctx.format().is_json() {
        return emit_json(&record);
    }
    println!("Player:  {}", record.username);
    println!("Wins:    {}", record.wins);
    println!("Losses:  {}", record.losses);
    println!("Ratio:   {:.3}", record.win_ratio);
    Ok(())
}
