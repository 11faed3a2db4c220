#[cfg(test)]
mod tests {
    use choreboard::db::db::Db;
    use choreboard::libs::config::{Config, DatabaseConfig, SchedulerConfig, CONFIG_FILE_NAME};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Each test gets its own directory to hold `config.json`.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join(CONFIG_FILE_NAME);
            ConfigTestContext {
                _temp_dir: temp_dir,
                path,
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.scheduler.is_none());
        assert!(config.database.is_none());

        let scheduler = SchedulerConfig::default();
        assert_eq!(scheduler.interval_secs, 3600);
        assert_eq!(scheduler.startup_delay_secs, 5);
        assert_eq!(scheduler.debounce_hours, 23);
        assert_eq!(scheduler.interval(), Duration::from_secs(3600));
        assert_eq!(scheduler.debounce(), chrono::Duration::hours(23));

        let database = DatabaseConfig::default();
        assert!(database.path.is_none());
        assert_eq!(database.busy_timeout_ms, 5000);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let scheduler = SchedulerConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(scheduler.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_oversized_debounce_saturates() {
        for debounce_hours in [3_000_000_000_000, i64::MAX as u64 + 1, u64::MAX] {
            let scheduler = SchedulerConfig {
                debounce_hours,
                ..Default::default()
            };
            assert_eq!(scheduler.debounce(), chrono::Duration::MAX);
        }

        let scheduler = SchedulerConfig {
            debounce_hours: 8760,
            ..Default::default()
        };
        assert_eq!(scheduler.debounce(), chrono::Duration::days(365));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            scheduler: Some(SchedulerConfig {
                interval_secs: 600,
                startup_delay_secs: 1,
                debounce_hours: 12,
            }),
            database: Some(DatabaseConfig {
                path: Some("/var/lib/choreboard/house.db".to_string()),
                busy_timeout_ms: 250,
            }),
        };
        config.save_to(&ctx.path).unwrap();

        assert_eq!(Config::read_from(&ctx.path).unwrap(), config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_sections_use_defaults(ctx: &mut ConfigTestContext) {
        std::fs::write(&ctx.path, r#"{ "scheduler": { "interval_secs": 90 } }"#).unwrap();

        let config = Config::read_from(&ctx.path).unwrap();
        let scheduler = config.scheduler.unwrap();
        assert_eq!(scheduler.interval_secs, 90);
        assert_eq!(scheduler.startup_delay_secs, 5);
        assert_eq!(scheduler.debounce_hours, 23);
        assert!(config.database.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_malformed_config_is_an_error(ctx: &mut ConfigTestContext) {
        std::fs::write(&ctx.path, "{ not json").unwrap();
        assert!(Config::read_from(&ctx.path).is_err());
    }

    #[test]
    fn test_configured_database_path_is_used() {
        let config = DatabaseConfig {
            path: Some("/tmp/elsewhere.db".to_string()),
            ..Default::default()
        };
        if std::env::var(choreboard::db::db::DB_PATH_ENV).is_err() {
            assert_eq!(Db::resolve_path(&config).unwrap(), PathBuf::from("/tmp/elsewhere.db"));
        }
    }
}
