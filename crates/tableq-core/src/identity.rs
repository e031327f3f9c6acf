//! Verified caller identity and the admin capability.
//!
//! Identities come only out of an [`IdentityProvider`]. Administrative queue
//! mutations take an [`AdminCapability`], which can only be minted from an
//! identity whose admin flag is set, so the check happens once at the
//! boundary and the core never trusts a client-supplied username for
//! privileged work.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Username reserved for the administrative identity.
pub const ADMIN_USERNAME: &str = "admin";

/// A caller whose credential has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    is_admin: bool,
}

impl Identity {
    /// Build an identity. Only identity providers and tests should call this.
    #[must_use]
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Exchange this identity for the admin capability.
    ///
    /// # Errors
    ///
    /// Returns `Error::AdminRequired` if the identity is not an admin.
    pub fn admin(&self) -> Result<AdminCapability> {
        if self.is_admin {
            Ok(AdminCapability {
                username: self.username.clone(),
            })
        } else {
            Err(Error::AdminRequired(self.username.clone()))
        }
    }
}

/// Proof that the caller is an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCapability {
    username: String,
}

impl AdminCapability {
    /// The admin acting with this capability, for audit logging.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.username
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IDENTITY PROVIDER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Verifies credential tokens.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a token to an identity, or `Error::InvalidToken`.
    async fn verify(&self, token: &str) -> Result<Identity>;
}

/// One configured credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub admin: bool,
}

/// Static token table, loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    grants: HashMap<String, Identity>,
}

impl TokenRegistry {
    #[must_use]
    pub fn new(grants: &[TokenGrant]) -> Self {
        let grants = grants
            .iter()
            .map(|g| (g.token.clone(), Identity::new(g.username.clone(), g.admin)))
            .collect();
        Self { grants }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for TokenRegistry {
    async fn verify(&self, token: &str) -> Result<Identity> {
        if token.is_empty() {
            return Err(Error::InvalidToken);
        }
        self.grants.get(token).cloned().ok_or(Error::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TokenRegistry {
        TokenRegistry::new(&[
            TokenGrant {
                token: "t-alice".into(),
                username: "alice".into(),
                admin: false,
            },
            TokenGrant {
                token: "t-root".into(),
                username: ADMIN_USERNAME.into(),
                admin: true,
            },
        ])
    }

    #[tokio::test]
    async fn test_verify_known_token() -> Result<()> {
        let identity = registry().verify("t-alice").await?;
        assert_eq!(identity.username(), "alice");
        assert!(!identity.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn test_verify_unknown_or_empty_token() {
        let registry = registry();
        assert_eq!(registry.verify("nope").await, Err(Error::InvalidToken));
        assert_eq!(registry.verify("").await, Err(Error::InvalidToken));
    }

    #[test]
    fn test_admin_capability_requires_flag() {
        assert!(matches!(
            Identity::new("alice", false).admin(),
            Err(Error::AdminRequired(_))
        ));
        let cap = Identity::new("root", true).admin();
        assert!(cap.is_ok_and(|c| c.actor() == "root"));
    }
}
