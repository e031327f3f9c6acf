//! Default configuration values

use super::types::{Config, IdentityConfig, LeaderboardConfig, OutcomeConfig};
use crate::outcome::MissingRecordPolicy;

pub(super) const DEFAULT_STATE_DB: &str = ".tableq/state.db";

impl Default for Config {
    fn default() -> Self {
        Self {
            state_db: DEFAULT_STATE_DB.to_string(),
            outcome: OutcomeConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

#[allow(clippy::derivable_impls)]
impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            missing_record: MissingRecordPolicy::Skip,
        }
    }
}

#[allow(clippy::derivable_impls)]
impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self { limit: 0 }
    }
}

#[allow(clippy::derivable_impls)]
impl Default for IdentityConfig {
    fn default() -> Self {
        Self { tokens: Vec::new() }
    }
}
