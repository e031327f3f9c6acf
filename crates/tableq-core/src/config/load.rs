//! Configuration loading from files and environment (Immutable functional pattern)

use std::path::{Path, PathBuf};

use super::types::{Config, ConfigLayer};
use crate::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration from all sources with hierarchy
///
/// # Errors
///
/// Returns error if:
/// - Config file is malformed TOML
/// - Config values fail validation
/// - An environment override cannot be parsed
pub fn load_config() -> Result<Config> {
    let project = project_config_path()?;
    load_config_from(global_config_path().as_deref(), &project)
}

/// Load configuration from explicit global and project paths.
///
/// Missing files are skipped. Environment variables still apply.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_from(global: Option<&Path>, project: &Path) -> Result<Config> {
    // 1. Start with built-in defaults
    let config = Config::default();

    // 2. Load global config if exists
    let config = match global {
        Some(path) if path.exists() => config.merge(load_toml_file(path)?),
        _ => config,
    };

    // 3. Load project config if exists
    let config = if project.exists() {
        config.merge(load_toml_file(project)?)
    } else {
        config
    };

    // 4. Apply environment variable overrides
    let config = config.apply_env_vars()?;

    // 5. Validate
    config.validate()?;
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// PATH HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tableq")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Get path to project config file
///
/// # Errors
///
/// Returns error if current directory cannot be determined
pub fn project_config_path() -> Result<PathBuf> {
    std::env::current_dir()
        .map(|dir| dir.join(".tableq/config.toml"))
        .map_err(|e| Error::io_error(format!("Failed to get current directory: {e}")))
}

/// Load a TOML file as a config layer
///
/// # Errors
///
/// Returns error if:
/// - Path is a directory instead of a file
/// - File cannot be read
/// - TOML is malformed
pub fn load_toml_file(path: &Path) -> Result<ConfigLayer> {
    if path.is_dir() {
        return Err(Error::io_error(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io_error(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::parse_error(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLE OVERRIDES (Immutable pattern)
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Apply environment variable overrides - immutable pattern
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    pub fn apply_env_vars(mut self) -> Result<Self> {
        // TABLEQ_STATE_DB
        if let Ok(value) = std::env::var("TABLEQ_STATE_DB") {
            if value.is_empty() {
                return Err(Error::invalid_config(
                    "TABLEQ_STATE_DB cannot be empty - unset the variable or provide a path",
                ));
            }
            self.state_db = value;
        }

        // TABLEQ_MISSING_RECORD
        if let Ok(value) = std::env::var("TABLEQ_MISSING_RECORD") {
            self.outcome.missing_record = value.parse().map_err(|_| {
                Error::invalid_config(format!(
                    "Invalid TABLEQ_MISSING_RECORD value '{value}': expected 'skip' or 'reject'"
                ))
            })?;
        }

        // TABLEQ_LEADERBOARD_LIMIT
        if let Ok(value) = std::env::var("TABLEQ_LEADERBOARD_LIMIT") {
            self.leaderboard.limit = value.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid TABLEQ_LEADERBOARD_LIMIT value: {e}"))
            })?;
        }

        Ok(self)
    }
}
