//! Every user-facing message of the command line front end.
//!
//! Text lives in [`display`](super::display); call sites pick a variant and
//! hand it to one of the `msg_*` macros.

#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved(String), // path
    ConfigModuleDatabase,
    ConfigModuleServer,
    PromptSelectModules,
    PromptDatabasePath,
    PromptServerHost,
    PromptServerPort,
    PromptServerApiToken,
    DatabaseReady(String), // path

    // === TASK MESSAGES ===
    TaskCreated(i64, String),
    TaskUpdated(i64),
    TaskDeleted(i64),
    TaskStatusChanged(i64, String),
    TaskCompleted(i64, String), // id, studied duration
    TasksHeader,
    NoTasksFound,
    ConfirmDeleteTask(String),

    // === CATEGORY MESSAGES ===
    CategoryCreated(String),
    CategoryUpdated(String),
    CategoryDeleted(String, usize), // name, detached tasks
    CategoriesHeader,
    NoCategoriesFound,
    ConfirmDeleteCategory(String, usize),

    // === PROJECT MESSAGES ===
    ProjectCreated(i64, String),
    ProjectUpdated(i64),
    ProjectStatusChanged(i64, String),
    ProjectDeleted(i64),
    ProjectsHeader,
    NoProjectsFound,
    ConfirmDeleteProject(String),
    ProjectSessionStarted(String, i64), // project name, session id
    ProjectSessionStopped(i64, String),
    ProjectSessionsHeader(String),
    ProjectTotalTime(String),

    // === STUDY SESSION MESSAGES ===
    SessionLogged(i64, String),
    SessionStarted(i64),
    SessionStopped(i64, String),
    SessionDeleted(i64),
    SessionsHeader,
    LiveSessionsHeader,
    NoSessionsFound,
    ConfirmDeleteSession(i64),

    // === GOAL MESSAGES ===
    GoalCreated(i64, String),
    GoalUpdated(i64),
    GoalDeleted(i64),
    GoalProgress(String, i64, i64, u8), // title, progress, target, percent
    GoalAchieved(String),
    GoalsHeader,
    NoGoalsFound,
    ConfirmDeleteGoal(String),

    // === REFLECTION MESSAGES ===
    ReflectionSaved(String), // date
    ReflectionDeleted(i64),
    ReflectionsHeader,
    NoReflectionsFound,
    ConfirmDeleteReflection(String),
    PromptReflectionNote,

    // === PROGRESS MESSAGES ===
    ProgressHeader(String), // date

    // === EXPORT MESSAGES ===
    ExportCompleted(String), // path
    ExportNothing,

    // === SERVER MESSAGES ===
    ServerStarting(String), // address
    ServerTokenEnabled,
    ServerFailed(String),
    ServerStopped,

    // === MIGRATION MESSAGES ===
    DatabaseUpToDate,
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DbVersion(u32, u32), // current, latest
    MigrationHistoryHeader,
    NoMigrationHistory,

    // === GENERAL ===
    OperationCancelled,
}
