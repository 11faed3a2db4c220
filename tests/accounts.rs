#[cfg(test)]
mod tests {
    use choreboard::db::db::Db;
    use choreboard::db::points::PointHistory;
    use choreboard::db::tasks::Tasks;
    use choreboard::db::users::Users;
    use choreboard::libs::accounts::Accounts;
    use choreboard::libs::error::ChoreError;
    use choreboard::libs::household::Household;
    use choreboard::libs::user::Role;
    use choreboard::libs::validation::{self, TaskInput};
    use test_context::{test_context, TestContext};

    struct AccountsContext {
        db: Db,
    }

    impl TestContext for AccountsContext {
        fn setup() -> Self {
            AccountsContext {
                db: Db::in_memory().unwrap(),
            }
        }
    }

    impl AccountsContext {
        fn register(&self, name: &str, email: &str) -> i64 {
            Accounts::new(&self.db.conn)
                .register(&validation::new_user(name, email).unwrap())
                .unwrap()
                .user
                .id
        }

        fn chore(&self, actor: i64, title: &str, points: i64, assigned_to: i64) -> i64 {
            let draft = TaskInput {
                title: title.to_string(),
                points,
                assigned_to,
                ..Default::default()
            }
            .validate()
            .unwrap();
            Household::new(&self.db.conn).create_task(actor, draft).unwrap().task().id
        }
    }

    #[test_context(AccountsContext)]
    #[test]
    fn first_member_becomes_approved_admin(ctx: &mut AccountsContext) {
        let accounts = Accounts::new(&ctx.db.conn);

        let first = accounts
            .register(&validation::new_user("Alice", "alice@example.com").unwrap())
            .unwrap();
        assert!(first.first_user);
        assert_eq!(first.user.role, Role::Admin);
        assert!(first.user.is_approved);
        assert_eq!(first.user.points, 0);

        let second = accounts
            .register(&validation::new_user("Bob", "bob@example.com").unwrap())
            .unwrap();
        assert!(!second.first_user);
        assert_eq!(second.user.role, Role::User);
        assert!(!second.user.is_approved);
        assert!(second.user.approved_by.is_none());
    }

    #[test_context(AccountsContext)]
    #[test]
    fn duplicate_email_is_a_conflict(ctx: &mut AccountsContext) {
        ctx.register("Alice", "alice@example.com");
        let accounts = Accounts::new(&ctx.db.conn);

        let err = accounts
            .register(&validation::new_user("Alice Again", "alice@example.com").unwrap())
            .unwrap_err();
        assert!(matches!(err, ChoreError::Conflict(_)));

        let err = accounts
            .register(&validation::new_user("Shouty Alice", "  ALICE@Example.COM ").unwrap())
            .unwrap_err();
        assert!(matches!(err, ChoreError::Conflict(_)));

        assert_eq!(Users::new(&ctx.db.conn).count().unwrap(), 1);
    }

    #[test_context(AccountsContext)]
    #[test]
    fn approval_records_the_approver(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let member = ctx.register("Bob", "bob@example.com");
        let accounts = Accounts::new(&ctx.db.conn);

        assert_eq!(accounts.pending(admin).unwrap().len(), 1);

        let approved = accounts.approve(admin, member).unwrap();
        assert!(approved.is_approved);
        assert_eq!(approved.approved_by, Some(admin));
        assert!(approved.approved_at.is_some());
        assert!(accounts.pending(admin).unwrap().is_empty());

        let everyone = accounts.all(admin).unwrap();
        let bob = everyone.iter().find(|view| view.user.id == member).unwrap();
        assert_eq!(bob.approved_by_name.as_deref(), Some("Alice"));
        let alice = everyone.iter().find(|view| view.user.id == admin).unwrap();
        assert!(alice.approved_by_name.is_none());

        let revoked = accounts.revoke(admin, member).unwrap();
        assert!(!revoked.is_approved);
        assert!(revoked.approved_by.is_none());
    }

    #[test_context(AccountsContext)]
    #[test]
    fn administration_requires_an_approved_admin(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let member = ctx.register("Bob", "bob@example.com");
        let pending = ctx.register("Carol", "carol@example.com");
        let accounts = Accounts::new(&ctx.db.conn);

        // Not approved yet: nothing but registration works.
        assert!(matches!(accounts.leaderboard(member), Err(ChoreError::Unauthorized(_))));
        assert!(matches!(accounts.approve(member, pending), Err(ChoreError::Unauthorized(_))));

        accounts.approve(admin, member).unwrap();
        assert!(accounts.leaderboard(member).is_ok());
        for result in [
            accounts.approve(member, pending).map(|_| ()),
            accounts.revoke(member, admin).map(|_| ()),
            accounts.delete(member, pending),
            accounts.reset_scores(member).map(|_| ()),
            accounts.pending(member).map(|_| ()),
        ] {
            assert!(matches!(result, Err(ChoreError::Unauthorized(_))));
        }

        assert!(matches!(accounts.leaderboard(9999), Err(ChoreError::Unauthorized(_))));
    }

    #[test_context(AccountsContext)]
    #[test]
    fn unknown_members_are_not_found(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let accounts = Accounts::new(&ctx.db.conn);

        assert!(matches!(
            accounts.approve(admin, 404),
            Err(ChoreError::NotFound { entity: "User", id: 404 })
        ));
        assert!(matches!(accounts.revoke(admin, 404), Err(ChoreError::NotFound { .. })));
        assert!(matches!(accounts.delete(admin, 404), Err(ChoreError::NotFound { .. })));
    }

    #[test_context(AccountsContext)]
    #[test]
    fn admins_cannot_remove_themselves(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let accounts = Accounts::new(&ctx.db.conn);

        assert!(matches!(accounts.delete(admin, admin), Err(ChoreError::Validation(_))));
        assert!(matches!(accounts.revoke(admin, admin), Err(ChoreError::Validation(_))));
        assert!(Users::new(&ctx.db.conn).get(admin).unwrap().unwrap().is_approved);
    }

    #[test_context(AccountsContext)]
    #[test]
    fn deleting_a_member_keeps_their_tasks(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let member = ctx.register("Bob", "bob@example.com");
        let accounts = Accounts::new(&ctx.db.conn);
        accounts.approve(admin, member).unwrap();

        let task_id = ctx.chore(member, "Clean windows", 8, member);
        Household::new(&ctx.db.conn).complete_task(member, task_id, None).unwrap();

        accounts.delete(admin, member).unwrap();
        assert!(Users::new(&ctx.db.conn).get(member).unwrap().is_none());

        let task = Tasks::new(&ctx.db.conn).get(task_id).unwrap().unwrap();
        assert!(task.completed);
        assert!(task.created_by.is_none());
        assert!(task.assigned_to.is_none());
        assert!(task.completed_by.is_none());
        assert!(PointHistory::new(&ctx.db.conn).for_user(member).unwrap().is_empty());

        assert!(matches!(accounts.delete(admin, member), Err(ChoreError::NotFound { .. })));
    }

    #[test_context(AccountsContext)]
    #[test]
    fn leaderboard_ranks_by_points_then_name(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let bob = ctx.register("Bob", "bob@example.com");
        let carol = ctx.register("Carol", "carol@example.com");
        let dave = ctx.register("Dave", "dave@example.com");
        let accounts = Accounts::new(&ctx.db.conn);
        accounts.approve(admin, bob).unwrap();
        accounts.approve(admin, carol).unwrap();

        let household = Household::new(&ctx.db.conn);
        for (who, points) in [(bob, 5), (carol, 5), (admin, 2)] {
            let task_id = ctx.chore(admin, "Sweep the porch", points, who);
            household.complete_task(who, task_id, None).unwrap();
        }

        let board: Vec<_> = accounts
            .leaderboard(admin)
            .unwrap()
            .into_iter()
            .map(|user| (user.name, user.points))
            .collect();
        assert_eq!(
            board,
            vec![("Bob".to_string(), 5), ("Carol".to_string(), 5), ("Alice".to_string(), 2)]
        );
        assert!(!accounts.leaderboard(admin).unwrap().iter().any(|user| user.id == dave));
    }

    #[test_context(AccountsContext)]
    #[test]
    fn reset_scores_clears_points_and_history(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let member = ctx.register("Bob", "bob@example.com");
        let accounts = Accounts::new(&ctx.db.conn);
        accounts.approve(admin, member).unwrap();

        let household = Household::new(&ctx.db.conn);
        for who in [admin, member] {
            let task_id = ctx.chore(admin, "Fold laundry", 4, who);
            household.complete_task(who, task_id, None).unwrap();
        }

        let reset = accounts.reset_scores(admin).unwrap();
        assert_eq!(reset, 2);

        let users = Users::new(&ctx.db.conn);
        assert_eq!(users.get(admin).unwrap().unwrap().points, 0);
        assert_eq!(users.get(member).unwrap().unwrap().points, 0);
        assert!(PointHistory::new(&ctx.db.conn).for_user(admin).unwrap().is_empty());
        assert!(PointHistory::new(&ctx.db.conn).for_user(member).unwrap().is_empty());
        assert_eq!(Tasks::new(&ctx.db.conn).count().unwrap(), 2);
    }

    #[test_context(AccountsContext)]
    #[test]
    fn failed_reset_leaves_scores_untouched(ctx: &mut AccountsContext) {
        let admin = ctx.register("Alice", "alice@example.com");
        let task_id = ctx.chore(admin, "Descale kettle", 6, admin);
        Household::new(&ctx.db.conn).complete_task(admin, task_id, None).unwrap();

        ctx.db
            .conn
            .execute_batch(
                "CREATE TRIGGER keep_history BEFORE DELETE ON point_history
                 BEGIN SELECT RAISE(ABORT, 'history is locked'); END;",
            )
            .unwrap();

        assert!(Accounts::new(&ctx.db.conn).reset_scores(admin).is_err());
        assert_eq!(Users::new(&ctx.db.conn).get(admin).unwrap().unwrap().points, 6);
        assert_eq!(PointHistory::new(&ctx.db.conn).for_user(admin).unwrap().len(), 1);
    }
}
