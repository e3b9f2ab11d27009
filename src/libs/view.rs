use super::category::Category;
use super::goal::StudyGoal;
use super::progress::DailyProgress;
use super::project::Project;
use super::reflection::DailyReflection;
use super::session::{format_duration, ProjectSession, StudySession, Timed};
use super::task::Task;
use chrono::NaiveDateTime;
use prettytable::{row, Table};

const DATE_TIME: &str = "%Y-%m-%d %H:%M";

fn id(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn end_time(end: Option<NaiveDateTime>) -> String {
    end.map(|t| t.format(DATE_TIME).to_string()).unwrap_or_else(|| "running".to_string())
}

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "CATEGORY", "PRIORITY", "DEADLINE", "STATUS"]);
        for task in tasks {
            table.add_row(row![
                id(task.id),
                task.title,
                optional(&task.category_id),
                task.priority,
                optional(&task.deadline),
                task.status
            ]);
        }
        table.printstd();
    }

    pub fn task(task: &Task) {
        let mut table = Table::new();
        table.add_row(row!["ID", id(task.id)]);
        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DESCRIPTION", optional(&task.description)]);
        table.add_row(row!["CATEGORY", optional(&task.category_id)]);
        table.add_row(row!["PRIORITY", task.priority]);
        table.add_row(row!["DEADLINE", optional(&task.deadline)]);
        table.add_row(row!["STATUS", task.status]);
        table.add_row(row!["CREATED", optional(&task.created_at)]);
        table.add_row(row!["COMPLETED", optional(&task.completed_at)]);
        table.printstd();
    }

    pub fn categories(categories: &[Category]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "COLOR"]);
        for category in categories {
            table.add_row(row![id(category.id), category.name, category.color]);
        }
        table.printstd();
    }

    pub fn projects(projects: &[Project]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "STATUS", "CATEGORY", "DESCRIPTION"]);
        for project in projects {
            table.add_row(row![
                id(project.id),
                project.name,
                project.status,
                optional(&project.category_id),
                optional(&project.description)
            ]);
        }
        table.printstd();
    }

    pub fn study_sessions(sessions: &[StudySession], now: NaiveDateTime) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TASK", "START", "END", "DURATION", "FOCUS", "NOTES"]);
        for session in sessions {
            table.add_row(row![
                id(session.id),
                optional(&session.task_id),
                session.start_time.format(DATE_TIME),
                end_time(session.end_time),
                format_duration(&session.duration_at(now)),
                optional(&session.focus_level),
                optional(&session.notes)
            ]);
        }
        table.printstd();
    }

    pub fn project_sessions(sessions: &[ProjectSession], now: NaiveDateTime) {
        let mut table = Table::new();

        table.add_row(row!["ID", "START", "END", "DURATION", "FOCUS", "NOTES"]);
        for session in sessions {
            table.add_row(row![
                id(session.id),
                session.start_time.format(DATE_TIME),
                end_time(session.end_time),
                format_duration(&session.duration_at(now)),
                optional(&session.focus_level),
                optional(&session.notes)
            ]);
        }
        table.printstd();
    }

    pub fn goals(goals: &[StudyGoal]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "FROM", "TO", "METRIC", "PROGRESS", "%"]);
        for goal in goals {
            table.add_row(row![
                id(goal.id),
                goal.title,
                goal.start_date,
                goal.end_date,
                goal.metric,
                format!("{}/{}", goal.progress, goal.target),
                goal.percent()
            ]);
        }
        table.printstd();
    }

    pub fn reflections(reflections: &[DailyReflection]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "MOOD", "NOTE"]);
        for reflection in reflections {
            table.add_row(row![id(reflection.id), reflection.date, optional(&reflection.mood), reflection.note]);
        }
        table.printstd();
    }

    pub fn progress(progress: &DailyProgress) {
        let mut table = Table::new();

        table.add_row(row!["TASKS DUE", format!("{} ({} done)", progress.tasks_due, progress.tasks_due_done)]);
        table.add_row(row!["COMPLETION", format!("{:.0}%", progress.completion_rate())]);
        table.add_row(row!["TASKS COMPLETED", progress.tasks_completed]);
        table.add_row(row!["STUDY SESSIONS", progress.study_sessions]);
        table.add_row(row!["STUDY TIME", format_duration(&chrono::Duration::minutes(progress.study_minutes))]);
        table.add_row(row!["PROJECT TIME", format_duration(&chrono::Duration::minutes(progress.project_minutes))]);
        table.add_row(row!["REFLECTION", if progress.has_reflection { "yes" } else { "no" }]);
        table.printstd();
    }

    pub fn migration_history(history: &[(u32, String, String)]) {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED AT"]);
        for (version, name, applied_at) in history {
            table.add_row(row![version, name, applied_at]);
        }
        table.printstd();
    }
}
