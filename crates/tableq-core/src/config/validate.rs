//! Configuration validation

use std::collections::HashSet;

use super::types::Config;
use crate::{Error, Result};

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any values are empty or duplicated
    pub fn validate(&self) -> Result<()> {
        if self.state_db.trim().is_empty() {
            return Err(Error::invalid_config("state_db cannot be empty"));
        }

        let mut seen = HashSet::new();
        for grant in &self.identity.tokens {
            if grant.token.is_empty() {
                return Err(Error::invalid_config(format!(
                    "identity token for '{}' cannot be empty",
                    grant.username
                )));
            }
            if grant.username.trim().is_empty() {
                return Err(Error::invalid_config(
                    "identity token username cannot be empty",
                ));
            }
            if !seen.insert(grant.token.as_str()) {
                return Err(Error::invalid_config(format!(
                    "identity token for '{}' is listed more than once",
                    grant.username
                )));
            }
        }

        Ok(())
    }
}
