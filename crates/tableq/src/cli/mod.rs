//! Command-line definition (clap builder API)

pub mod handlers;

use clap::{value_parser, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("tableq")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Waitlist, game reports and leaderboard for a shared two-player table")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite state file (overrides state_db and TABLEQ_STATE_DB)"),
        )
        .arg(
            Arg::new("token")
                .long("token")
                .global(true)
                .env("TABLEQ_TOKEN")
                .hide_env_values(true)
                .value_name("TOKEN")
                .help("Credential token identifying the caller"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .short('j')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON for machine parsing"),
        )
        .subcommand(cmd_queue())
        .subcommand(cmd_game())
        .subcommand(cmd_leaderboard())
        .subcommand(Command::new("profile").about("Show your own record"))
        .subcommand(cmd_users())
        .after_help(
            "EXIT CODES:\n  \
             0 = success\n  \
             1 = invalid request, credential or configuration\n  \
             2 = not found or conflicting state\n  \
             3 = storage unavailable",
        )
}

fn cmd_queue() -> Command {
    Command::new("queue")
        .about("Inspect and change the waitlist")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("List the waitlist in order"))
        .subcommand(Command::new("join").about("Join the back of the waitlist"))
        .subcommand(
            Command::new("remove")
                .about("Remove a player from the waitlist (admin)")
                .arg(username_arg()),
        )
        .subcommand(Command::new("remove-top").about("Remove the player at position 1 (admin)"))
        .subcommand(Command::new("clear").about("Empty the waitlist (admin)"))
        .subcommand(
            Command::new("insert")
                .about("Insert a player at a 1-based position (admin)")
                .arg(username_arg())
                .arg(
                    Arg::new("position")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Target position, 1 through length + 1"),
                ),
        )
}

fn cmd_game() -> Command {
    Command::new("game")
        .about("Report finished games")
        .subcommand_required(true)
        .subcommand(
            Command::new("report")
                .about("Report the result of the game at the table")
                .arg(
                    Arg::new("winner")
                        .long("winner")
                        .required(true)
                        .value_name("USER"),
                )
                .arg(
                    Arg::new("loser")
                        .long("loser")
                        .required(true)
                        .value_name("USER"),
                )
                .after_help(
                    "Only one of the two seated players may report. The winner keeps\n\
                     position 1 and the loser leaves the waitlist.",
                ),
        )
}

fn cmd_leaderboard() -> Command {
    Command::new("leaderboard")
        .about("Rank players by win ratio, then wins")
        .arg(
            Arg::new("limit")
                .long("limit")
                .short('n')
                .value_parser(value_parser!(usize))
                .help("Show at most N rows (0 = all; defaults to [leaderboard] limit)"),
        )
}

fn cmd_users() -> Command {
    Command::new("users")
        .about("Manage registered users")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List registered usernames (admin)"))
        .subcommand(
            Command::new("register")
                .about("Register a new user")
                .arg(username_arg())
                .arg(
                    Arg::new("password-hash")
                        .long("password-hash")
                        .required(true)
                        .value_name("HASH")
                        .help("Credential hash, stored as given"),
                ),
        )
}

fn username_arg() -> Arg {
    Arg::new("username").required(true).value_name("USER")
}
