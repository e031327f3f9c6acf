//! Configuration merging logic (Immutable functional pattern)
//!
//! Later layers override earlier ones (defaults → global → project → env → CLI).
//! Only keys a layer actually sets take effect, so a later file can put a
//! value back to its default.

use super::types::{
    Config, ConfigLayer, IdentityConfig, IdentityLayer, LeaderboardConfig, LeaderboardLayer,
    OutcomeConfig, OutcomeLayer,
};

impl Config {
    /// Apply one file layer on top of this config - immutable pattern
    ///
    /// Note: token lists are replaced, not appended.
    pub fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            state_db: layer.state_db.unwrap_or(self.state_db),
            outcome: self.outcome.merge(layer.outcome),
            leaderboard: self.leaderboard.merge(layer.leaderboard),
            identity: self.identity.merge(layer.identity),
        }
    }
}

impl OutcomeConfig {
    fn merge(self, layer: OutcomeLayer) -> Self {
        Self {
            missing_record: layer.missing_record.unwrap_or(self.missing_record),
        }
    }
}

impl LeaderboardConfig {
    fn merge(self, layer: LeaderboardLayer) -> Self {
        Self {
            limit: layer.limit.unwrap_or(self.limit),
        }
    }
}

impl IdentityConfig {
    fn merge(self, layer: IdentityLayer) -> Self {
        Self {
            tokens: layer.tokens.unwrap_or(self.tokens),
        }
    }
}
