#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use studydesk::db::db::Db;
    use studydesk::libs::clock;
    use studydesk::libs::reflection::ReflectionInput;
    use studydesk::services::Services;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ReflectionTestContext {
        _temp_dir: TempDir,
        services: Services,
    }

    impl TestContext for ReflectionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("studydesk.db")).unwrap();
            ReflectionTestContext {
                _temp_dir: temp_dir,
                services: Services::new(db),
            }
        }
    }

    fn note(date: Option<&str>, text: &str, mood: Option<i32>) -> ReflectionInput {
        ReflectionInput {
            date: date.map(str::to_string),
            note: text.to_string(),
            mood,
        }
    }

    #[test_context(ReflectionTestContext)]
    #[test]
    fn test_one_reflection_per_day(ctx: &mut ReflectionTestContext) {
        let reflections = &ctx.services.reflections;

        let first = reflections.write(note(Some("2026-03-01"), "Slow start", Some(2))).unwrap();
        let second = reflections.write(note(Some("2026-03-01"), "Caught up in the evening", Some(4))).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(reflections.list().unwrap().len(), 1);

        let stored = reflections.get_by_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()).unwrap();
        assert_eq!(stored.note, "Caught up in the evening");
        assert_eq!(stored.mood, Some(4));
    }

    #[test_context(ReflectionTestContext)]
    #[test]
    fn test_reflection_defaults_to_today(ctx: &mut ReflectionTestContext) {
        let reflection = ctx.services.reflections.write(note(None, "Good focus", None)).unwrap();
        assert_eq!(reflection.date, clock::today());
        assert_eq!(reflection.mood, None);
    }

    #[test_context(ReflectionTestContext)]
    #[test]
    fn test_reflection_validation(ctx: &mut ReflectionTestContext) {
        let reflections = &ctx.services.reflections;

        let err = reflections.write(note(Some("2026-03-01"), "   ", None)).unwrap_err();
        assert_eq!(err.error_code(), "REFLECTION_NOTE_REQUIRED");

        let err = reflections.write(note(Some("2026-03-01"), "Tired", Some(0))).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_MOOD");

        let err = reflections.write(note(Some("March 1st"), "Tired", None)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATE");

        assert!(reflections.list().unwrap().is_empty());
    }

    #[test_context(ReflectionTestContext)]
    #[test]
    fn test_missing_reflection(ctx: &mut ReflectionTestContext) {
        let reflections = &ctx.services.reflections;
        let day = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();

        let err = reflections.get_by_date(day).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "DAILY_REFLECTION_NOT_FOUND");

        let id = reflections.write(note(Some("2026-03-05"), "Done", None)).unwrap().id.unwrap();
        reflections.delete(id).unwrap();
        assert_eq!(reflections.get(id).unwrap_err().error_code(), "DAILY_REFLECTION_NOT_FOUND");
    }
}
