#[cfg(test)]
mod tests {
    use choreboard::db::db::Db;
    use choreboard::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("choreboard.db");
            MigrationTestContext {
                _temp_dir: temp_dir,
                path,
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_starts_at_version_zero(ctx: &mut MigrationTestContext) {
        let conn = Db::new_without_migrations(&ctx.path).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_unreadable_version_is_an_error(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.path).unwrap();
        conn.execute("CREATE TABLE migrations (id INTEGER PRIMARY KEY, name TEXT)", [])
            .unwrap();

        assert!(get_db_version(&conn).is_err());
        assert!(needs_migration(&conn).is_err());
        assert!(MigrationManager::new().run_migrations(&mut conn).is_err());

        let users: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(users, 0);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.path).unwrap();

        let manager = MigrationManager::new();
        assert_eq!(get_db_version(&db.conn).unwrap(), manager.latest_version());
        assert_eq!(manager.latest_version(), 4);
        assert!(!needs_migration(&db.conn).unwrap());

        for table in ["users", "tasks", "point_history", "recurring_tasks"] {
            let count: i64 = db
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        let names: Vec<_> = history.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["create_base_tables", "add_recurring_tasks", "add_user_approval", "add_indices"]
        );
        for (i, (version, _, applied_at)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
            assert!(!applied_at.is_empty());
            assert!(manager.is_migration_applied(&conn, *version).unwrap());
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        let version1 = get_db_version(&conn).unwrap();

        manager.run_migrations(&mut conn).unwrap();
        let version2 = get_db_version(&conn).unwrap();

        assert_eq!(version1, version2);
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), 4);

        // Reopening an existing database leaves it as is.
        drop(conn);
        let db = Db::open(&ctx.path).unwrap();
        assert_eq!(get_db_version(&db.conn).unwrap(), version1);
    }

    #[cfg(debug_assertions)]
    #[test_context(MigrationTestContext)]
    #[test]
    fn test_rollback_forgets_newer_records(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.path).unwrap();
        let manager = MigrationManager::new();
        manager.run_migrations(&mut conn).unwrap();

        manager.rollback_to(&mut conn, 2).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 2);
        assert!(!manager.is_migration_applied(&conn, 3).unwrap());
        assert!(needs_migration(&conn).unwrap());

        // Rolling forward is a no-op.
        manager.rollback_to(&mut conn, 10).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 2);
    }
}
