#[cfg(test)]
mod tests {
    use studydesk::db::db::Db;
    use studydesk::libs::kinds::{Priority, TaskStatus};
    use studydesk::libs::task::{TaskFilter, TaskInput};
    use studydesk::services::Services;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TaskTestContext {
        _temp_dir: TempDir,
        services: Services,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("studydesk.db")).unwrap();
            TaskTestContext {
                _temp_dir: temp_dir,
                services: Services::new(db),
            }
        }
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_defaults(ctx: &mut TaskTestContext) {
        let task = ctx.services.tasks.create(input("  Read Ch.1  ")).unwrap();

        assert!(task.id.is_some());
        assert_eq!(task.title, "Read Ch.1");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.created_at.is_some());
        assert!(task.completed_at.is_none());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_update_keeps_priority_and_status(ctx: &mut TaskTestContext) {
        let tasks = &ctx.services.tasks;
        let task = tasks
            .create(TaskInput {
                title: "Original".to_string(),
                priority: Some("HIGH".to_string()),
                status: Some("IN_PROGRESS".to_string()),
                ..Default::default()
            })
            .unwrap();
        let id = task.id.unwrap();

        let updated = tasks
            .update(
                id,
                TaskInput {
                    title: "Renamed".to_string(),
                    description: Some("Chapter one".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description.as_deref(), Some("Chapter one"));
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(tasks.get(id).unwrap(), updated);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_validation(ctx: &mut TaskTestContext) {
        let tasks = &ctx.services.tasks;

        let err = tasks.create(input("   ")).unwrap_err();
        assert_eq!(err.error_code(), "TASK_TITLE_REQUIRED");

        let err = tasks.create(input(&"x".repeat(201))).unwrap_err();
        assert_eq!(err.error_code(), "TASK_TITLE_TOO_LONG");

        let err = tasks
            .create(TaskInput {
                priority: Some("URGENT".to_string()),
                ..input("Read")
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PRIORITY");

        let err = tasks
            .create(TaskInput {
                deadline: Some("31/12/2026".to_string()),
                ..input("Read")
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATE");

        let err = tasks
            .create(TaskInput {
                category_id: Some(99),
                ..input("Read")
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CATEGORY_REFERENCE");

        assert!(tasks.list(TaskFilter::All).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_status_tracks_completion(ctx: &mut TaskTestContext) {
        let tasks = &ctx.services.tasks;
        let id = tasks.create(input("Essay")).unwrap().id.unwrap();

        let done = tasks.set_status(id, "DONE").unwrap();
        assert_eq!(done.status, TaskStatus::Done);
        assert!(done.completed_at.is_some());

        let reopened = tasks.set_status(id, "PENDING").unwrap();
        assert_eq!(reopened.status, TaskStatus::Pending);
        assert!(reopened.completed_at.is_none());

        let err = tasks.set_status(id, "FINISHED").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_STATUS");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_filters(ctx: &mut TaskTestContext) {
        let tasks = &ctx.services.tasks;
        tasks
            .create(TaskInput {
                deadline: Some("2026-03-01".to_string()),
                ..input("Due first")
            })
            .unwrap();
        let second = tasks.create(input("Undated")).unwrap();
        tasks.set_status(second.id.unwrap(), "DONE").unwrap();

        let due = tasks
            .list(TaskFilter::DueOn(chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()))
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "Due first");

        let done = tasks.list(TaskFilter::Status(TaskStatus::Done)).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "Undated");

        assert_eq!(tasks.list(TaskFilter::All).unwrap().len(), 2);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_delete(ctx: &mut TaskTestContext) {
        let tasks = &ctx.services.tasks;
        let id = tasks.create(input("Temporary")).unwrap().id.unwrap();

        tasks.delete(id).unwrap();

        assert_eq!(tasks.get(id).unwrap_err().error_code(), "TASK_NOT_FOUND");
        assert_eq!(tasks.delete(id).unwrap_err().error_code(), "TASK_NOT_FOUND");
    }
}
