use super::kinds::GoalMetric;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A target over a date range: a number of sessions or of studied minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGoal {
    pub id: Option<i64>,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub metric: GoalMetric,
    pub target: i64,
    pub progress: i64,
    pub created_at: Option<NaiveDateTime>,
}

impl StudyGoal {
    pub fn is_achieved(&self) -> bool {
        self.progress >= self.target
    }

    /// Completion ratio in percent, capped at 100.
    pub fn percent(&self) -> u8 {
        if self.target <= 0 {
            return 100;
        }
        let ratio = i128::from(self.progress.max(0)) * 100 / i128::from(self.target);
        ratio.min(100) as u8
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalInput {
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub metric: Option<String>,
    pub target: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: i64, progress: i64) -> StudyGoal {
        StudyGoal {
            id: None,
            title: "Read".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            metric: GoalMetric::Sessions,
            target,
            progress,
            created_at: None,
        }
    }

    #[test]
    fn percent_is_capped() {
        assert_eq!(goal(10, 5).percent(), 50);
        assert_eq!(goal(10, 25).percent(), 100);
        assert!(goal(10, 10).is_achieved());
        assert!(!goal(10, 9).is_achieved());
    }

    #[test]
    fn percent_handles_progress_near_the_limit() {
        assert_eq!(goal(10, i64::MAX).percent(), 100);
        assert_eq!(goal(i64::MAX, i64::MAX / 2).percent(), 49);
        assert_eq!(goal(10, -3).percent(), 0);
    }

    #[test]
    fn covers_is_inclusive() {
        let g = goal(1, 0);
        assert!(g.covers(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(g.covers(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!g.covers(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
    }
}
