//! Integration tests for config

#[cfg(test)]
mod tests {
    use maid_config::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        std::env::remove_var("MAID_STORAGE_ROOT");
        std::env::remove_var("MAID_DB_PATH");
        std::env::remove_var("MAID_MAX_CONNECTIONS");
        std::env::remove_var("MAID_MISSING_PREVIOUS");
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[paths]
storage_root = "/srv/files"

[state]
max_connections = 2

[tracker]
missing_previous = "fail"

[[tracker.tracked]]
entity = "document"
fields = ["attachment"]

[[tracker.tracked]]
entity = "avatar"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.storage_root(), PathBuf::from("/srv/files"));
        assert_eq!(config.db_path(), PathBuf::from(constants::DB_PATH));
        assert_eq!(config.state.max_connections, 2);
        assert_eq!(config.state.busy_timeout_secs, 30);
        assert_eq!(config.tracker.missing_previous, MissingPreviousPolicy::Fail);
        assert_eq!(
            config.tracker.tracked,
            vec![
                TrackedEntity {
                    entity: "document".to_string(),
                    fields: Some(vec!["attachment".to_string()]),
                },
                TrackedEntity {
                    entity: "avatar".to_string(),
                    fields: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.tracker.missing_previous, MissingPreviousPolicy::Ignore);
        assert!(config.tracker.tracked.is_empty());
        assert_eq!(config.state.max_connections, 5);
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[tracker\nmissing_previous = ").unwrap();
        assert!(Config::load_from_file(temp_file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = Config::load_or_default(Some(std::path::Path::new("/nonexistent/maid.toml")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            maid_errors::Error::Config(maid_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("MAID_STORAGE_ROOT", "/tmp/maid-files");
        std::env::set_var("MAID_MISSING_PREVIOUS", "fail");
        std::env::set_var("MAID_MAX_CONNECTIONS", "9");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.storage_root(), PathBuf::from("/tmp/maid-files"));
        assert_eq!(config.tracker.missing_previous, MissingPreviousPolicy::Fail);
        assert_eq!(config.state.max_connections, 9);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("MAID_MISSING_PREVIOUS", "sometimes");

        let mut config = Config::default();
        let result = config.merge_env();
        assert!(result.is_err());

        clear_env();
    }
}
