//! Loading-focused tests for configuration

#[cfg(test)]
mod loading_tests {
    use std::path::Path;

    use serial_test::serial;

    use crate::config::{load_config_from, load_toml_file, Config};
    use crate::outcome::MissingRecordPolicy;
    use crate::{Error, Result};

    fn write(path: &Path, body: &str) -> Result<()> {
        std::fs::write(path, body)
            .map_err(|e| Error::io_error(format!("Failed to write test file: {e}")))
    }

    fn clear_env() {
        for key in [
            "TABLEQ_STATE_DB",
            "TABLEQ_MISSING_RECORD",
            "TABLEQ_LEADERBOARD_LIMIT",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_no_config_files_returns_defaults() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let config = load_config_from(None, &dir.path().join("missing.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_project_overrides_global() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        write(
            &global,
            "state_db = \"/var/lib/tableq.db\"\n[leaderboard]\nlimit = 5\n",
        )?;
        write(&project, "[leaderboard]\nlimit = 10\n")?;

        let config = load_config_from(Some(&global), &project)?;
        assert_eq!(config.state_db, "/var/lib/tableq.db");
        assert_eq!(config.leaderboard.limit, 10);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_project_can_reset_global_values_to_defaults() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        write(
            &global,
            "[outcome]\nmissing_record = \"reject\"\n[leaderboard]\nlimit = 20\n",
        )?;
        write(
            &project,
            "[outcome]\nmissing_record = \"skip\"\n[leaderboard]\nlimit = 0\n",
        )?;

        let config = load_config_from(Some(&global), &project)?;
        assert_eq!(config.outcome.missing_record, MissingRecordPolicy::Skip);
        assert_eq!(config.leaderboard.limit, 0);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_project_can_clear_global_tokens() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        write(
            &global,
            "[[identity.tokens]]\ntoken = \"t-alice\"\nusername = \"alice\"\n",
        )?;
        write(&project, "[identity]\ntokens = []\n")?;

        let config = load_config_from(Some(&global), &project)?;
        assert!(config.identity.tokens.is_empty());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_tokens_and_policy_parse() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let project = dir.path().join("config.toml");
        write(
            &project,
            r#"
[outcome]
missing_record = "reject"

[[identity.tokens]]
token = "t-alice"
username = "alice"

[[identity.tokens]]
token = "t-root"
username = "admin"
admin = true
"#,
        )?;

        let config = load_config_from(None, &project)?;
        assert_eq!(config.outcome.missing_record, MissingRecordPolicy::Reject);
        assert_eq!(config.identity.tokens.len(), 2);
        assert!(!config.identity.tokens[0].admin);
        assert!(config.identity.tokens[1].admin);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_env_overrides_files() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        let project = dir.path().join("config.toml");
        write(&project, "state_db = \"file.db\"\n")?;

        std::env::set_var("TABLEQ_STATE_DB", "env.db");
        std::env::set_var("TABLEQ_MISSING_RECORD", "reject");
        let result = load_config_from(None, &project);
        clear_env();

        let config = result?;
        assert_eq!(config.state_db, "env.db");
        assert_eq!(config.outcome.missing_record, MissingRecordPolicy::Reject);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_invalid_env_policy_rejected() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()?;
        std::env::set_var("TABLEQ_MISSING_RECORD", "sometimes");
        let result = load_config_from(None, &dir.path().join("none.toml"));
        clear_env();

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.toml");
        write(&path, "state_db = \n invalid toml [[[")?;

        assert!(matches!(load_toml_file(&path), Err(Error::Parse(_))));
        Ok(())
    }

    #[test]
    fn test_directory_path_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(matches!(load_toml_file(dir.path()), Err(Error::Io(_))));
        Ok(())
    }
}
