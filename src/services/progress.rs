use crate::db::db::Db;
use crate::db::reflections::Reflections;
use crate::db::sessions::{ProjectSessions, StudySessions};
use crate::db::tasks::Tasks;
use crate::libs::kinds::TaskStatus;
use crate::libs::progress::DailyProgress;
use crate::libs::session::SessionTotals;
use crate::libs::task::TaskFilter;
use crate::libs::error::AppResult;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Clone)]
pub struct ProgressService {
    db: Db,
}

impl ProgressService {
    pub fn new(db: Db) -> Self {
        ProgressService { db }
    }

    /// Snapshot of one day. Live sessions are counted up to `now`.
    pub fn daily(&self, date: NaiveDate, now: NaiveDateTime) -> AppResult<DailyProgress> {
        self.db.with_conn(|conn| {
            let tasks = Tasks::new(conn);
            let due = tasks.fetch(TaskFilter::DueOn(date))?;
            let completed = tasks.completed_on(date)?;
            let study = StudySessions::new(conn).started_on(date)?;
            let project = ProjectSessions::new(conn).started_on(date)?;
            let has_reflection = Reflections::new(conn).get_by_date(date)?.is_some();

            Ok(DailyProgress {
                date,
                tasks_due: due.len(),
                tasks_due_done: due.iter().filter(|t| t.status == TaskStatus::Done).count(),
                tasks_completed: completed.len(),
                study_sessions: study.len(),
                study_minutes: study.total_at(now).num_minutes(),
                project_minutes: project.total_at(now).num_minutes(),
                has_reflection,
            })
        })
    }
}
