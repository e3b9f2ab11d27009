#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use studydesk::db::db::Db;
    use studydesk::libs::project::ProjectInput;
    use studydesk::libs::reflection::ReflectionInput;
    use studydesk::libs::session::SessionInput;
    use studydesk::libs::task::TaskInput;
    use studydesk::services::Services;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ProgressTestContext {
        _temp_dir: TempDir,
        services: Services,
    }

    impl TestContext for ProgressTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("studydesk.db")).unwrap();
            ProgressTestContext {
                _temp_dir: temp_dir,
                services: Services::new(db),
            }
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn at(text: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn due_task(services: &Services, title: &str) -> i64 {
        services
            .tasks
            .create(TaskInput {
                title: title.to_string(),
                deadline: Some("2026-03-10".to_string()),
                ..Default::default()
            })
            .unwrap()
            .id
            .unwrap()
    }

    #[test_context(ProgressTestContext)]
    #[test]
    fn test_empty_day(ctx: &mut ProgressTestContext) {
        let progress = ctx.services.progress.daily(day(), at("2026-03-10 20:00:00")).unwrap();

        assert_eq!(progress.date, day());
        assert_eq!(progress.tasks_due, 0);
        assert_eq!(progress.study_sessions, 0);
        assert_eq!(progress.study_minutes, 0);
        assert!(!progress.has_reflection);
    }

    #[test_context(ProgressTestContext)]
    #[test]
    fn test_daily_snapshot(ctx: &mut ProgressTestContext) {
        let services = &ctx.services;
        let done = due_task(services, "Problem set");
        due_task(services, "Flashcards");
        services.tasks.set_status(done, "DONE").unwrap();

        services
            .sessions
            .log(SessionInput {
                start_time: Some("2026-03-10 09:00:00".to_string()),
                end_time: Some("2026-03-10 10:00:00".to_string()),
                ..Default::default()
            })
            .unwrap();
        // Live session counts up to the snapshot time.
        services
            .sessions
            .start(SessionInput {
                start_time: Some("2026-03-10 19:30:00".to_string()),
                ..Default::default()
            })
            .unwrap();

        let project = services
            .projects
            .create(ProjectInput {
                name: "Thesis".to_string(),
                ..Default::default()
            })
            .unwrap();
        let session = services
            .projects
            .start_session(
                project.id.unwrap(),
                SessionInput {
                    start_time: Some("2026-03-10 13:00:00".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        services
            .projects
            .stop_session(session.id.unwrap(), Some(at("2026-03-10 13:40:00")))
            .unwrap();

        services
            .reflections
            .write(ReflectionInput {
                date: Some("2026-03-10".to_string()),
                note: "Productive".to_string(),
                mood: Some(5),
            })
            .unwrap();

        let progress = services.progress.daily(day(), at("2026-03-10 20:00:00")).unwrap();
        assert_eq!(progress.tasks_due, 2);
        assert_eq!(progress.tasks_due_done, 1);
        assert_eq!(progress.study_sessions, 2);
        assert_eq!(progress.study_minutes, 90);
        assert_eq!(progress.project_minutes, 40);
        assert!(progress.has_reflection);
        assert!((progress.completion_rate() - 50.0).abs() < f64::EPSILON);
    }
}
