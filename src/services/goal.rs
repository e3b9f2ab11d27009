use crate::db::db::Db;
use crate::db::goals::Goals;
use crate::db::repository::Repository;
use crate::db::sessions::StudySessions;
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult};
use crate::libs::goal::{GoalInput, StudyGoal};
use crate::libs::kinds::GoalMetric;
use crate::libs::session::{SessionTotals, Timed};
use crate::libs::validation;
use chrono::NaiveDate;
use tracing::info;

#[derive(Clone)]
pub struct GoalService {
    db: Db,
}

impl GoalService {
    pub fn new(db: Db) -> Self {
        GoalService { db }
    }

    pub fn create(&self, input: GoalInput) -> AppResult<StudyGoal> {
        let goal = build_goal(input, None)?;
        let goal = self.db.with_conn(|conn| Goals::new(conn).save(goal))?;
        info!(goal_id = ?goal.id, title = %goal.title, "study goal created");
        Ok(goal)
    }

    /// Replaces the goal's definition. Absent dates, metric and target keep
    /// their current value; progress is kept.
    pub fn update(&self, id: i64, input: GoalInput) -> AppResult<StudyGoal> {
        self.db.transaction(|tx| {
            let goals = Goals::new(tx);
            let existing = goals.find_by_id(id)?;
            goals.save(build_goal(input, Some(existing))?)
        })
    }

    pub fn get(&self, id: i64) -> AppResult<StudyGoal> {
        self.db.with_conn(|conn| Goals::new(conn).find_by_id(id))
    }

    pub fn list(&self) -> AppResult<Vec<StudyGoal>> {
        self.db.with_conn(|conn| Goals::new(conn).find_all())
    }

    pub fn active_on(&self, date: NaiveDate) -> AppResult<Vec<StudyGoal>> {
        let goals = self.db.with_conn(|conn| Goals::new(conn).find_all())?;
        Ok(goals.into_iter().filter(|goal| goal.covers(date)).collect())
    }

    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.db.with_conn(|conn| Goals::new(conn).delete(id))?;
        info!(goal_id = id, "study goal deleted");
        Ok(())
    }

    /// Bumps the progress counter by a positive amount.
    pub fn add_progress(&self, id: i64, amount: i64) -> AppResult<StudyGoal> {
        if amount <= 0 {
            return Err(AppError::validation(
                "amount",
                "INVALID_GOAL_PROGRESS",
                format!("Progress increment must be positive, got {}", amount),
            ));
        }
        self.db.transaction(|tx| {
            let goals = Goals::new(tx);
            let goal = goals.find_by_id(id)?;
            let progress = goal.progress.checked_add(amount).ok_or_else(|| {
                AppError::validation(
                    "amount",
                    "INVALID_GOAL_PROGRESS",
                    format!("Progress {} plus {} does not fit in a counter", goal.progress, amount),
                )
            })?;
            goals.set_progress(id, progress)
        })
    }

    /// Recomputes progress from the closed study sessions that started inside
    /// the goal's range.
    pub fn refresh_progress(&self, id: i64) -> AppResult<StudyGoal> {
        let now = clock::now();
        let goal = self.db.transaction(|tx| {
            let goals = Goals::new(tx);
            let goal = goals.find_by_id(id)?;
            let sessions: Vec<_> = StudySessions::new(tx)
                .started_between(goal.start_date, goal.end_date)?
                .into_iter()
                .filter(|s| !s.is_live())
                .collect();
            let progress = match goal.metric {
                GoalMetric::Sessions => sessions.len() as i64,
                GoalMetric::Minutes => sessions.total_at(now).num_minutes(),
            };
            goals.set_progress(id, progress)
        })?;
        info!(goal_id = id, progress = goal.progress, target = goal.target, "study goal refreshed");
        Ok(goal)
    }

    pub fn is_achieved(&self, id: i64) -> AppResult<bool> {
        Ok(self.get(id)?.is_achieved())
    }
}

fn build_goal(input: GoalInput, existing: Option<StudyGoal>) -> AppResult<StudyGoal> {
    let title = validation::required(&input.title, "title", "GOAL_TITLE_REQUIRED")?;
    validation::max_len(&title, validation::MAX_TITLE_LEN, "title", "GOAL_TITLE_TOO_LONG")?;
    let start_date = match input.start_date.as_deref() {
        Some(value) => validation::date(value, "startDate")?,
        None => existing.as_ref().map(|g| g.start_date).unwrap_or_else(clock::today),
    };
    let end_date = match input.end_date.as_deref() {
        Some(value) => validation::date(value, "endDate")?,
        None => match existing.as_ref() {
            Some(goal) => goal.end_date,
            None => return Err(AppError::validation("endDate", "INVALID_DATE", "Field 'endDate' is required")),
        },
    };
    validation::date_range(start_date, end_date, "endDate")?;
    let metric = match input.metric.as_deref() {
        Some(value) => value.parse().map_err(|_| {
            AppError::validation("metric", "INVALID_GOAL_METRIC", format!("Metric '{}' is not one of {}", value, GoalMetric::choices()))
        })?,
        None => existing.as_ref().map(|g| g.metric).unwrap_or_default(),
    };
    let target = match input.target.or(existing.as_ref().map(|g| g.target)) {
        Some(target) if target > 0 => target,
        other => {
            return Err(AppError::validation(
                "target",
                "INVALID_GOAL_TARGET",
                format!("Target must be a positive number, got {}", other.map_or("nothing".to_string(), |t| t.to_string())),
            ))
        }
    };

    Ok(StudyGoal {
        id: existing.as_ref().and_then(|g| g.id),
        title,
        start_date,
        end_date,
        metric,
        target,
        progress: existing.as_ref().map(|g| g.progress).unwrap_or(0),
        created_at: existing.and_then(|g| g.created_at),
    })
}
