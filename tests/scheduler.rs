#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use choreboard::db::db::Db;
    use choreboard::db::recurring::RecurringTasks;
    use choreboard::db::tasks::Tasks;
    use choreboard::libs::accounts::Accounts;
    use choreboard::libs::config::SchedulerConfig;
    use choreboard::libs::recurrence::{Recurrence, RecurrenceType};
    use choreboard::libs::scheduler::{run_sweep, Scheduler, SharedDb};
    use choreboard::libs::task::NewRecurringTask;
    use choreboard::libs::validation;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// A shared in-memory database with one never-generated daily definition.
    fn household() -> (SharedDb, i64) {
        let db = Db::in_memory().unwrap();
        let admin = Accounts::new(&db.conn)
            .register(&validation::new_user("Alice", "alice@example.com").unwrap())
            .unwrap()
            .user
            .id;
        let definition = RecurringTasks::new(&db.conn)
            .insert(&NewRecurringTask {
                title: "Empty the dishwasher".to_string(),
                description: None,
                points: 2,
                created_by: Some(admin),
                assigned_to: Some(admin),
                recurrence: Recurrence::new(RecurrenceType::Days, 1).unwrap(),
                created_at: Utc::now() - ChronoDuration::days(2),
            })
            .unwrap();
        (Arc::new(Mutex::new(db)), definition)
    }

    fn instances(db: &SharedDb, definition: i64) -> usize {
        Tasks::new(&db.lock().conn).for_parent(definition).unwrap().len()
    }

    fn quick_config() -> SchedulerConfig {
        SchedulerConfig {
            interval_secs: 1,
            startup_delay_secs: 0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn scheduler_generates_due_definitions() {
        let (db, definition) = household();
        let mut scheduler = Scheduler::new(db.clone(), quick_config());
        scheduler.start();
        assert!(scheduler.is_running());

        let mut generated = 0;
        for _ in 0..50 {
            generated = instances(&db, definition);
            if generated > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(generated, 1);

        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());

        // Later ticks fell inside the debounce window.
        assert_eq!(instances(&db, definition), 1);
    }

    #[tokio::test]
    async fn stopping_during_the_startup_delay_skips_the_sweep() {
        let (db, definition) = household();
        let config = SchedulerConfig {
            startup_delay_secs: 3600,
            ..Default::default()
        };
        let mut scheduler = Scheduler::new(db.clone(), config);
        scheduler.start();
        scheduler.stop().await.unwrap();

        assert!(!scheduler.is_running());
        assert_eq!(instances(&db, definition), 0);
    }

    #[tokio::test]
    async fn restarting_keeps_a_single_loop() {
        let (db, definition) = household();
        let config = SchedulerConfig {
            startup_delay_secs: 3600,
            ..Default::default()
        };
        let mut scheduler = Scheduler::new(db.clone(), config);
        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());

        scheduler.stop().await.unwrap();
        assert!(!scheduler.is_running());
        // Stopping twice is harmless.
        scheduler.stop().await.unwrap();
        assert_eq!(instances(&db, definition), 0);
    }

    #[tokio::test]
    async fn run_sweep_reports_on_the_blocking_pool() {
        let (db, definition) = household();

        let report = run_sweep(db.clone(), ChronoDuration::hours(23)).await.unwrap();
        assert_eq!(report.examined, 1);
        assert_eq!(report.generated.len(), 1);

        let report = run_sweep(db.clone(), ChronoDuration::hours(23)).await.unwrap();
        assert_eq!(report.examined, 0);
        assert_eq!(instances(&db, definition), 1);
    }
}
