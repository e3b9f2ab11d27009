#[cfg(test)]
mod tests {
    use studydesk::db::db::Db;
    use studydesk::libs::error::AppError;
    use studydesk::libs::kinds::TaskStatus;
    use studydesk::libs::session::{SessionInput, Timed};
    use studydesk::libs::task::TaskInput;
    use studydesk::services::Services;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TransactionTestContext {
        _temp_dir: TempDir,
        db: Db,
        services: Services,
    }

    impl TestContext for TransactionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("studydesk.db")).unwrap();
            TransactionTestContext {
                _temp_dir: temp_dir,
                services: Services::new(db.clone()),
                db,
            }
        }
    }

    fn session(start: &str, end: &str) -> SessionInput {
        SessionInput {
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            focus_level: Some(4),
            ..Default::default()
        }
    }

    fn new_task(services: &Services) -> i64 {
        services
            .tasks
            .create(TaskInput {
                title: "Lab report".to_string(),
                ..Default::default()
            })
            .unwrap()
            .id
            .unwrap()
    }

    #[test_context(TransactionTestContext)]
    #[test]
    fn test_complete_with_session_commits_both(ctx: &mut TransactionTestContext) {
        let id = new_task(&ctx.services);

        let (task, logged) = ctx
            .services
            .tasks
            .complete_with_session(id, session("2026-03-01 14:00:00", "2026-03-01 15:15:00"))
            .unwrap();

        assert_eq!(task.status, TaskStatus::Done);
        assert!(task.completed_at.is_some());
        assert_eq!(logged.task_id, Some(id));
        assert_eq!(logged.focus_level, Some(4));
        assert!(!logged.is_live());
        assert_eq!(ctx.services.sessions.for_task(id).unwrap().len(), 1);
    }

    #[test_context(TransactionTestContext)]
    #[test]
    fn test_failed_session_write_rolls_back_task(ctx: &mut TransactionTestContext) {
        let id = new_task(&ctx.services);

        ctx.db
            .with_conn(|conn| Ok(conn.execute_batch("DROP TABLE study_sessions")?))
            .unwrap();

        let err = ctx
            .services
            .tasks
            .complete_with_session(id, session("2026-03-01 14:00:00", "2026-03-01 15:00:00"))
            .unwrap_err();
        assert!(matches!(err, AppError::Database { .. }));
        assert_eq!(err.status(), 500);

        let task = ctx.services.tasks.get(id).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.completed_at.is_none());
    }

    #[test_context(TransactionTestContext)]
    #[test]
    fn test_invalid_session_leaves_task_untouched(ctx: &mut TransactionTestContext) {
        let id = new_task(&ctx.services);

        let err = ctx
            .services
            .tasks
            .complete_with_session(id, session("2026-03-01 15:00:00", "2026-03-01 14:00:00"))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATE_RANGE");
        assert_eq!(ctx.services.tasks.get(id).unwrap().status, TaskStatus::Pending);

        let err = ctx
            .services
            .tasks
            .complete_with_session(999, session("2026-03-01 14:00:00", "2026-03-01 15:00:00"))
            .unwrap_err();
        assert_eq!(err.error_code(), "TASK_NOT_FOUND");
        assert!(ctx.services.sessions.list().unwrap().is_empty());
    }
}
