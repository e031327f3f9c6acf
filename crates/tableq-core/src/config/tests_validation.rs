//! Validation-focused tests for configuration

#[cfg(test)]
mod validation_tests {
    use crate::config::{Config, ConfigLayer, LeaderboardLayer};
    use crate::identity::TokenGrant;

    fn grant(token: &str, username: &str) -> TokenGrant {
        TokenGrant {
            token: token.to_string(),
            username: username.to_string(),
            admin: false,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_state_db_rejected() {
        let config = Config {
            state_db: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_tokens_rejected() {
        let mut config = Config::default();
        config.identity.tokens = vec![grant("same", "alice"), grant("same", "bob")];

        let result = config.validate();
        assert!(result.is_err_and(|e| e.to_string().contains("more than once")));
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut config = Config::default();
        config.identity.tokens = vec![grant("", "alice")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_keeps_earlier_value_when_layer_is_silent() {
        let mut base = Config::default();
        base.leaderboard.limit = 7;
        let merged = base.merge(ConfigLayer::default());
        assert_eq!(merged.leaderboard.limit, 7);
    }

    #[test]
    fn test_merge_applies_explicit_default_value() {
        let mut base = Config::default();
        base.leaderboard.limit = 7;
        let layer = ConfigLayer {
            leaderboard: LeaderboardLayer { limit: Some(0) },
            ..ConfigLayer::default()
        };
        assert_eq!(base.merge(layer).leaderboard.limit, 0);
    }
}
