//! Argument extraction and dispatch

use anyhow::Result;
use clap::ArgMatches;
use tableq_core::config::load_config;

use super::build_cli;
use crate::commands::{
    game::{self, ReportOptions},
    leaderboard,
    queue::{self, QueueAction},
    users, Context, OutputFormat,
};

/// Render an error and its first distinct cause.
pub fn format_error(err: &anyhow::Error) -> String {
    let msg = err.to_string();
    if let Some(source) = err.source() {
        let source_msg = source.to_string();
        if !msg.contains(&source_msg) && !source_msg.is_empty() {
            return format!("{msg}\nCause: {source_msg}");
        }
    }
    msg
}

/// Parse the process arguments and run the selected command.
pub async fn run_cli() -> Result<()> {
    let matches = build_cli().get_matches();
    dispatch(&matches).await
}

/// Run the command selected by `matches`.
pub async fn dispatch(matches: &ArgMatches) -> Result<()> {
    let ctx = open_context(matches).await?;

    match matches.subcommand() {
        Some(("queue", sub_m)) => handle_queue(&ctx, sub_m).await,
        Some(("game", sub_m)) => handle_game(&ctx, sub_m).await,
        Some(("leaderboard", sub_m)) => {
            leaderboard::run(&ctx, sub_m.get_one::<usize>("limit").copied()).await
        }
        Some(("profile", _)) => users::profile(&ctx).await,
        Some(("users", sub_m)) => handle_users(&ctx, sub_m).await,
        _ => anyhow::bail!("Unknown command. Run 'tableq --help' for usage."),
    }
}

async fn open_context(matches: &ArgMatches) -> Result<Context> {
    let mut config = load_config()?;
    if let Some(db) = matches.get_one::<String>("db") {
        config.state_db.clone_from(db);
        config.validate()?;
    }

    let token = matches.get_one::<String>("token").cloned();
    let format = OutputFormat::from_json_flag(matches.get_flag("json"));
    Context::open(config, token, format).await
}

async fn handle_queue(ctx: &Context, matches: &ArgMatches) -> Result<()> {
    let action = match matches.subcommand() {
        Some(("show", _)) => QueueAction::Show,
        Some(("join", _)) => QueueAction::Join,
        Some(("remove", sub_m)) => QueueAction::Remove {
            username: required(sub_m, "username")?,
        },
        Some(("remove-top", _)) => QueueAction::RemoveTop,
        Some(("clear", _)) => QueueAction::Clear,
        Some(("insert", sub_m)) => QueueAction::Insert {
            username: required(sub_m, "username")?,
            position: sub_m
                .get_one::<usize>("position")
                .copied()
                .ok_or_else(|| anyhow::anyhow!("Missing required argument 'position'"))?,
        },
        _ => anyhow::bail!("Unknown queue subcommand. Run 'tableq queue --help' for usage."),
    };
    queue::run(ctx, action).await
}

async fn handle_game(ctx: &Context, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("report", sub_m)) => {
            let options = ReportOptions {
                winner: required(sub_m, "winner")?,
                loser: required(sub_m, "loser")?,
            };
            game::report(ctx, &options).await
        }
        _ => anyhow::bail!("Unknown game subcommand. Run 'tableq game --help' for usage."),
    }
}

async fn handle_users(ctx: &Context, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => users::list(ctx).await,
        Some(("register", sub_m)) => {
            let username = required(sub_m, "username")?;
            let password_hash = required(sub_m, "password-hash")?;
            users::register(ctx, &username, &password_hash).await
        }
        _ => anyhow::bail!("Unknown users subcommand. Run 'tableq users --help' for usage."),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing required argument '{name}'"))
}
