#[cfg(test)]
mod tests {
    use studydesk::db::db::Db;
    use studydesk::libs::goal::GoalInput;
    use studydesk::libs::kinds::GoalMetric;
    use studydesk::libs::session::SessionInput;
    use studydesk::services::Services;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct GoalTestContext {
        _temp_dir: TempDir,
        services: Services,
    }

    impl TestContext for GoalTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("studydesk.db")).unwrap();
            GoalTestContext {
                _temp_dir: temp_dir,
                services: Services::new(db),
            }
        }
    }

    fn goal(metric: &str, target: i64) -> GoalInput {
        GoalInput {
            title: "March reading".to_string(),
            start_date: Some("2026-03-01".to_string()),
            end_date: Some("2026-03-31".to_string()),
            metric: Some(metric.to_string()),
            target: Some(target),
        }
    }

    fn log(services: &Services, start: &str, end: &str) {
        services
            .sessions
            .log(SessionInput {
                start_time: Some(start.to_string()),
                end_time: Some(end.to_string()),
                ..Default::default()
            })
            .unwrap();
    }

    #[test_context(GoalTestContext)]
    #[test]
    fn test_goal_validation(ctx: &mut GoalTestContext) {
        let goals = &ctx.services.goals;

        let err = goals
            .create(GoalInput {
                end_date: Some("2026-02-01".to_string()),
                ..goal("SESSIONS", 5)
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATE_RANGE");

        let err = goals.create(goal("HOURS", 5)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GOAL_METRIC");

        let err = goals.create(goal("SESSIONS", 0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GOAL_TARGET");

        let err = goals
            .create(GoalInput {
                title: String::new(),
                ..goal("SESSIONS", 5)
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "GOAL_TITLE_REQUIRED");

        assert!(goals.list().unwrap().is_empty());
    }

    #[test_context(GoalTestContext)]
    #[test]
    fn test_manual_progress(ctx: &mut GoalTestContext) {
        let goals = &ctx.services.goals;
        let created = goals.create(goal("SESSIONS", 3)).unwrap();
        let id = created.id.unwrap();
        assert_eq!(created.progress, 0);
        assert_eq!(created.metric, GoalMetric::Sessions);

        let err = goals.add_progress(id, 0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GOAL_PROGRESS");

        let halfway = goals.add_progress(id, 2).unwrap();
        assert_eq!(halfway.progress, 2);
        assert_eq!(halfway.percent(), 66);
        assert!(!goals.is_achieved(id).unwrap());

        let done = goals.add_progress(id, 2).unwrap();
        assert_eq!(done.progress, 4);
        assert_eq!(done.percent(), 100);
        assert!(goals.is_achieved(id).unwrap());
    }

    #[test_context(GoalTestContext)]
    #[test]
    fn test_progress_near_the_counter_limit(ctx: &mut GoalTestContext) {
        let goals = &ctx.services.goals;
        let id = goals.create(goal("MINUTES", 60)).unwrap().id.unwrap();

        let huge = goals.add_progress(id, 100_000_000_000_000_000).unwrap();
        assert_eq!(huge.percent(), 100);
        assert_eq!(goals.get(id).unwrap().percent(), 100);

        let err = goals.add_progress(id, i64::MAX).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_GOAL_PROGRESS");
        assert_eq!(goals.get(id).unwrap().progress, 100_000_000_000_000_000);
    }

    #[test_context(GoalTestContext)]
    #[test]
    fn test_refresh_counts_sessions_in_range(ctx: &mut GoalTestContext) {
        let services = &ctx.services;
        let by_count = services.goals.create(goal("SESSIONS", 2)).unwrap().id.unwrap();
        let by_minutes = services.goals.create(goal("MINUTES", 120)).unwrap().id.unwrap();

        log(services, "2026-03-02 09:00:00", "2026-03-02 10:00:00");
        log(services, "2026-03-15 18:00:00", "2026-03-15 18:45:00");
        // Outside the goal's range.
        log(services, "2026-04-01 09:00:00", "2026-04-01 12:00:00");

        let refreshed = services.goals.refresh_progress(by_count).unwrap();
        assert_eq!(refreshed.progress, 2);
        assert!(refreshed.is_achieved());

        let refreshed = services.goals.refresh_progress(by_minutes).unwrap();
        assert_eq!(refreshed.progress, 105);
        assert!(!refreshed.is_achieved());
    }

    #[test_context(GoalTestContext)]
    #[test]
    fn test_update_keeps_progress(ctx: &mut GoalTestContext) {
        let goals = &ctx.services.goals;
        let id = goals.create(goal("SESSIONS", 10)).unwrap().id.unwrap();
        goals.add_progress(id, 4).unwrap();

        let updated = goals
            .update(
                id,
                GoalInput {
                    title: "April reading".to_string(),
                    target: Some(20),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "April reading");
        assert_eq!(updated.target, 20);
        assert_eq!(updated.progress, 4);
        assert_eq!(updated.end_date.to_string(), "2026-03-31");

        let active = goals.active_on(chrono::NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()).unwrap();
        assert_eq!(active.len(), 1);
        let inactive = goals.active_on(chrono::NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()).unwrap();
        assert!(inactive.is_empty());

        goals.delete(id).unwrap();
        assert_eq!(goals.get(id).unwrap_err().error_code(), "STUDY_GOAL_NOT_FOUND");
    }
}
