//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::{identity::TokenGrant, outcome::MissingRecordPolicy};

/// Root configuration structure
///
/// Loaded from defaults → global → project → env vars → CLI flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the ledger and the queue snapshot.
    pub state_db: String,
    pub outcome: OutcomeConfig,
    pub leaderboard: LeaderboardConfig,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutcomeConfig {
    pub missing_record: MissingRecordPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Maximum rows shown; 0 shows everyone.
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityConfig {
    pub tokens: Vec<TokenGrant>,
}

/// One config file as written.
///
/// Every field is optional so a layer can tell "not mentioned" apart from
/// "set back to the default value".
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigLayer {
    pub state_db: Option<String>,
    pub outcome: OutcomeLayer,
    pub leaderboard: LeaderboardLayer,
    pub identity: IdentityLayer,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutcomeLayer {
    pub missing_record: Option<MissingRecordPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeaderboardLayer {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityLayer {
    pub tokens: Option<Vec<TokenGrant>>,
}
