//! # Tableq Core
//!
//! Waitlist engine and game outcome workflow for a shared two-player table.
//!
//! This crate provides:
//! - `queue` / `engine`: the ordered waitlist and its mutex-guarded owner
//! - `outcome`: validation and application of reported games
//! - `leaderboard`: ranking over ledger records
//! - `ledger` / `identity`: the collaborator boundaries the core consumes
//! - `table`: the operations exposed to the boundary layer
//! - `config`: layered TOML configuration
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` / `expect()` / `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod engine;
mod error;
pub mod identity;
pub mod leaderboard;
pub mod ledger;
pub mod outcome;
pub mod queue;
pub mod registration;
pub mod table;

pub use config::Config;
pub use engine::QueueEngine;
pub use error::{Error, Result};
pub use identity::{AdminCapability, Identity, IdentityProvider, TokenGrant, TokenRegistry};
pub use leaderboard::LeaderboardRow;
pub use ledger::{InMemoryLedger, UserLedger, UserRecord};
pub use outcome::{GameOutcome, GameReport, MissingRecordPolicy, ValidatedReport};
pub use queue::{QueueEntry, WaitQueue, TABLE_SEATS};
pub use table::Table;
