//! Study and project sessions.
//!
//! A session is live while `end_time` is `None`. Its duration is computed at
//! read time: `end - start` once closed, `now - start` while live.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Anything with a start and an optional end.
pub trait Timed {
    fn start_time(&self) -> NaiveDateTime;
    fn end_time(&self) -> Option<NaiveDateTime>;

    fn is_live(&self) -> bool {
        self.end_time().is_none()
    }

    /// Duration against the given clock value. Never negative.
    fn duration_at(&self, now: NaiveDateTime) -> Duration {
        let end = self.end_time().unwrap_or(now);
        (end - self.start_time()).max(Duration::zero())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Option<i64>,
    pub task_id: Option<i64>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub focus_level: Option<i32>,
    pub notes: Option<String>,
}

impl Timed for StudySession {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSession {
    pub id: Option<i64>,
    pub project_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub focus_level: Option<i32>,
    pub notes: Option<String>,
}

impl Timed for ProjectSession {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }
}

/// Session fields as they arrive from the CLI or a JSON body.
///
/// `parent_id` is the task for study sessions and the project for project
/// sessions. A missing `start_time` means "now".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionInput {
    #[serde(alias = "taskId", alias = "projectId")]
    pub parent_id: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub focus_level: Option<i32>,
    pub notes: Option<String>,
}

/// A session with its duration resolved, as returned to front ends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<S> {
    #[serde(flatten)]
    pub session: S,
    pub live: bool,
    pub duration_minutes: i64,
}

impl<S: Timed> SessionView<S> {
    pub fn at(session: S, now: NaiveDateTime) -> Self {
        SessionView {
            live: session.is_live(),
            duration_minutes: session.duration_at(now).num_minutes(),
            session,
        }
    }
}

pub trait SessionTotals {
    fn total_at(&self, now: NaiveDateTime) -> Duration;
}

impl<S: Timed> SessionTotals for [S] {
    fn total_at(&self, now: NaiveDateTime) -> Duration {
        self.iter().fold(Duration::zero(), |acc, s| acc + s.duration_at(now))
    }
}

pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;
    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn session(start: NaiveDateTime, end: Option<NaiveDateTime>) -> StudySession {
        StudySession {
            id: None,
            task_id: None,
            start_time: start,
            end_time: end,
            focus_level: None,
            notes: None,
        }
    }

    #[test]
    fn closed_session_ignores_clock() {
        let s = session(at(9, 0), Some(at(10, 30)));
        assert_eq!(s.duration_at(at(23, 0)), Duration::minutes(90));
        assert!(!s.is_live());
    }

    #[test]
    fn live_session_runs_against_clock() {
        let s = session(at(9, 0), None);
        assert!(s.is_live());
        assert_eq!(s.duration_at(at(9, 45)), Duration::minutes(45));
        assert_eq!(s.duration_at(at(8, 0)), Duration::zero());
    }

    #[test]
    fn totals_and_formatting() {
        let sessions = vec![session(at(9, 0), Some(at(10, 0))), session(at(11, 0), Some(at(11, 25)))];
        let total = sessions.total_at(at(12, 0));
        assert_eq!(total, Duration::minutes(85));
        assert_eq!(format_duration(&total), "01:25");
    }
}
