//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: ~/.config/tableq/config.toml
//! 3. Project config: .tableq/config.toml
//! 4. Environment variables: TABLEQ_*
//! 5. CLI flags (command-specific)
//!
//! # Example Config
//!
//! ```toml
//! state_db = ".tableq/state.db"
//!
//! [outcome]
//! missing_record = "reject"
//!
//! [leaderboard]
//! limit = 20
//!
//! [[identity.tokens]]
//! token = "s3cret"
//! username = "admin"
//! admin = true
//! ```

mod defaults;
mod load;
mod merge;
mod types;
mod validate;

#[cfg(test)]
mod tests_loading;
#[cfg(test)]
mod tests_validation;

pub use load::{global_config_path, load_config, load_config_from, load_toml_file, project_config_path};
pub use types::{
    Config, ConfigLayer, IdentityConfig, IdentityLayer, LeaderboardConfig, LeaderboardLayer,
    OutcomeConfig, OutcomeLayer,
};
