//! Tableq - shared table waitlist
//!
//! Clap boundary layer over `tableq-core`, with `SQLite` persistence for the
//! ledger and the queue and a file lock serializing concurrent invocations.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod commands;
pub mod db;
pub mod lock;
pub mod staging;

pub use db::SqliteLedger;
pub use staging::StagedLedger;
