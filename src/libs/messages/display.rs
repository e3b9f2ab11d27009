//! Display text for [`Message`].

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved(path) => format!("Configuration saved to {}", path),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleServer => "REST server settings".to_string(),
            Message::PromptSelectModules => "Select the settings to configure".to_string(),
            Message::PromptDatabasePath => "Database file".to_string(),
            Message::PromptServerHost => "Host to bind".to_string(),
            Message::PromptServerPort => "Port".to_string(),
            Message::PromptServerApiToken => "API token (leave empty to disable)".to_string(),
            Message::DatabaseReady(path) => format!("Database ready at {}", path),

            // === TASK MESSAGES ===
            Message::TaskCreated(id, title) => format!("Task #{} '{}' created", id, title),
            Message::TaskUpdated(id) => format!("Task #{} updated", id),
            Message::TaskDeleted(id) => format!("Task #{} deleted", id),
            Message::TaskStatusChanged(id, status) => format!("Task #{} is now {}", id, status),
            Message::TaskCompleted(id, duration) => format!("Task #{} done after {} of study", id, duration),
            Message::TasksHeader => "Tasks".to_string(),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}'?", title),

            // === CATEGORY MESSAGES ===
            Message::CategoryCreated(name) => format!("Category '{}' created", name),
            Message::CategoryUpdated(name) => format!("Category '{}' updated", name),
            Message::CategoryDeleted(name, 0) => format!("Category '{}' deleted", name),
            Message::CategoryDeleted(name, count) => {
                format!("Category '{}' deleted, {} task(s) left without a category", name, count)
            }
            Message::CategoriesHeader => "Categories".to_string(),
            Message::NoCategoriesFound => "No categories found".to_string(),
            Message::ConfirmDeleteCategory(name, 0) => format!("Delete category '{}'?", name),
            Message::ConfirmDeleteCategory(name, count) => {
                format!("Category '{}' is used by {} task(s). Delete it anyway?", name, count)
            }

            // === PROJECT MESSAGES ===
            Message::ProjectCreated(id, name) => format!("Project #{} '{}' created", id, name),
            Message::ProjectUpdated(id) => format!("Project #{} updated", id),
            Message::ProjectStatusChanged(id, status) => format!("Project #{} is now {}", id, status),
            Message::ProjectDeleted(id) => format!("Project #{} deleted with its sessions", id),
            Message::ProjectsHeader => "Projects".to_string(),
            Message::NoProjectsFound => "No projects found".to_string(),
            Message::ConfirmDeleteProject(name) => format!("Delete project '{}' and all its sessions?", name),
            Message::ProjectSessionStarted(name, id) => format!("Session #{} started on '{}'", id, name),
            Message::ProjectSessionStopped(id, duration) => format!("Project session #{} stopped after {}", id, duration),
            Message::ProjectSessionsHeader(name) => format!("Sessions of '{}'", name),
            Message::ProjectTotalTime(duration) => format!("Total time: {}", duration),

            // === STUDY SESSION MESSAGES ===
            Message::SessionLogged(id, duration) => format!("Study session #{} logged ({})", id, duration),
            Message::SessionStarted(id) => format!("Study session #{} started", id),
            Message::SessionStopped(id, duration) => format!("Study session #{} stopped after {}", id, duration),
            Message::SessionDeleted(id) => format!("Study session #{} deleted", id),
            Message::SessionsHeader => "Study sessions".to_string(),
            Message::LiveSessionsHeader => "Running sessions".to_string(),
            Message::NoSessionsFound => "No sessions found".to_string(),
            Message::ConfirmDeleteSession(id) => format!("Delete study session #{}?", id),

            // === GOAL MESSAGES ===
            Message::GoalCreated(id, title) => format!("Goal #{} '{}' created", id, title),
            Message::GoalUpdated(id) => format!("Goal #{} updated", id),
            Message::GoalDeleted(id) => format!("Goal #{} deleted", id),
            Message::GoalProgress(title, progress, target, percent) => {
                format!("'{}': {} of {} ({}%)", title, progress, target, percent)
            }
            Message::GoalAchieved(title) => format!("Goal '{}' achieved!", title),
            Message::GoalsHeader => "Study goals".to_string(),
            Message::NoGoalsFound => "No goals found".to_string(),
            Message::ConfirmDeleteGoal(title) => format!("Delete goal '{}'?", title),

            // === REFLECTION MESSAGES ===
            Message::ReflectionSaved(date) => format!("Reflection for {} saved", date),
            Message::ReflectionDeleted(id) => format!("Reflection #{} deleted", id),
            Message::ReflectionsHeader => "Daily reflections".to_string(),
            Message::NoReflectionsFound => "No reflections found".to_string(),
            Message::ConfirmDeleteReflection(date) => format!("Delete the reflection for {}?", date),
            Message::PromptReflectionNote => "How did today go".to_string(),

            // === PROGRESS MESSAGES ===
            Message::ProgressHeader(date) => format!("Progress for {}", date),

            // === EXPORT MESSAGES ===
            Message::ExportCompleted(path) => format!("Export written to {}", path),
            Message::ExportNothing => "Nothing to export".to_string(),

            // === SERVER MESSAGES ===
            Message::ServerStarting(addr) => format!("REST API listening on http://{}", addr),
            Message::ServerTokenEnabled => "Bearer token required for every request".to_string(),
            Message::ServerFailed(address) => format!("Server on {} failed", address),
            Message::ServerStopped => "Server stopped".to_string(),

            // === MIGRATION MESSAGES ===
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, e) => format!("Migration v{} failed: {}", version, e),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::DbVersion(current, latest) => format!("Schema version {} (latest {})", current, latest),
            Message::MigrationHistoryHeader => "Applied migrations".to_string(),
            Message::NoMigrationHistory => "No migrations applied yet".to_string(),

            // === GENERAL ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };
        write!(f, "{}", s)
    }
}
