use super::http::HttpResponse;
use super::router::{RequestContext, Router, RouterBuilder};
use crate::libs::clock;
use crate::libs::error::{AppError, AppResult, VALIDATION_INVALID_INPUT};
use crate::libs::goal::StudyGoal;
use crate::libs::metadata;
use crate::libs::session::{SessionInput, SessionView};
use crate::libs::validation;
use crate::services::{project, task, Services};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatusInput {
    status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StopInput {
    end_time: Option<String>,
}

impl StopInput {
    fn end_time(&self) -> AppResult<Option<NaiveDateTime>> {
        self.end_time
            .as_deref()
            .map(|value| validation::datetime(value, "endTime"))
            .transpose()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProgressInput {
    amount: i64,
}

fn to_json<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("Cannot serialize response: {}", e)))
}

fn ok<T: Serialize>(value: &T) -> AppResult<HttpResponse> {
    Ok(HttpResponse::ok().json(&to_json(value)?))
}

fn created<T: Serialize>(value: &T) -> AppResult<HttpResponse> {
    Ok(HttpResponse::created().json(&to_json(value)?))
}

fn query_id(ctx: &RequestContext, name: &'static str) -> AppResult<Option<i64>> {
    ctx.query(name)
        .map(|raw| {
            raw.parse().map_err(|_| {
                AppError::validation(name, VALIDATION_INVALID_INPUT, format!("Query parameter '{}' must be a number", name))
            })
        })
        .transpose()
}

/// `?live`, `?live=true` and `?live=1` select live sessions; `false` and `0`
/// leave the list unfiltered.
fn live_only(ctx: &RequestContext) -> AppResult<bool> {
    match ctx.request.query_param("live").map(|v| v.trim().to_lowercase()) {
        None => Ok(false),
        Some(value) => match value.as_str() {
            "" | "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(AppError::validation(
                "live",
                VALIDATION_INVALID_INPUT,
                format!("Query parameter 'live' must be true or false, got '{}'", value),
            )),
        },
    }
}

fn goal_json(goal: &StudyGoal) -> AppResult<Value> {
    let mut value = to_json(goal)?;
    if let Value::Object(map) = &mut value {
        map.insert("achieved".to_string(), json!(goal.is_achieved()));
        map.insert("percent".to_string(), json!(goal.percent()));
    }
    Ok(value)
}

pub fn build_router() -> Router {
    let mut builder = RouterBuilder::new();

    builder.get("/health", |_, _| {
        ok(&json!({ "status": "UP", "name": metadata::name(), "version": metadata::version() }))
    });

    register_task_routes(&mut builder);
    register_category_routes(&mut builder);
    register_project_routes(&mut builder);
    register_session_routes(&mut builder);
    register_goal_routes(&mut builder);
    register_reflection_routes(&mut builder);

    builder.get("/progress", |services, ctx| {
        let date = match ctx.query("date") {
            Some(value) => validation::date(value, "date")?,
            None => clock::today(),
        };
        ok(&services.progress.daily(date, clock::now())?)
    });

    builder.build()
}

fn register_task_routes(builder: &mut RouterBuilder) {
    builder.get("/tasks", |services, ctx| {
        let filter = task::filter(ctx.query("status"), query_id(ctx, "categoryId")?, ctx.query("due"))?;
        ok(&services.tasks.list(filter)?)
    });
    builder.post("/tasks", |services, ctx| created(&services.tasks.create(ctx.body()?)?));
    builder.get("/tasks/{id}", |services, ctx| ok(&services.tasks.get(ctx.path_id("id")?)?));
    builder.put("/tasks/{id}", |services, ctx| {
        ok(&services.tasks.update(ctx.path_id("id")?, ctx.body()?)?)
    });
    builder.delete("/tasks/{id}", |services, ctx| {
        services.tasks.delete(ctx.path_id("id")?)?;
        Ok(HttpResponse::no_content())
    });
    builder.patch("/tasks/{id}/status", |services, ctx| {
        let input: StatusInput = ctx.body()?;
        ok(&services.tasks.set_status(ctx.path_id("id")?, &input.status)?)
    });
    builder.post("/tasks/{id}/complete", |services, ctx| {
        let (task, session) = services.tasks.complete_with_session(ctx.path_id("id")?, ctx.body()?)?;
        ok(&json!({
            "task": to_json(&task)?,
            "session": to_json(&SessionView::at(session, clock::now()))?,
        }))
    });
}

fn register_category_routes(builder: &mut RouterBuilder) {
    builder.get("/categories", |services, ctx| match ctx.query("name") {
        Some(name) => ok(&vec![services.categories.get_by_name(name)?]),
        None => ok(&services.categories.list()?),
    });
    builder.post("/categories", |services, ctx| created(&services.categories.create(ctx.body()?)?));
    builder.get("/categories/{id}", |services, ctx| ok(&services.categories.get(ctx.path_id("id")?)?));
    builder.put("/categories/{id}", |services, ctx| {
        ok(&services.categories.update(ctx.path_id("id")?, ctx.body()?)?)
    });
    builder.delete("/categories/{id}", |services, ctx| {
        services.categories.delete(ctx.path_id("id")?)?;
        Ok(HttpResponse::no_content())
    });
}

fn register_project_routes(builder: &mut RouterBuilder) {
    builder.get("/projects", |services, ctx| {
        let status = ctx.query("status").map(project::parse_status).transpose()?;
        ok(&services.projects.list(status)?)
    });
    builder.post("/projects", |services, ctx| created(&services.projects.create(ctx.body()?)?));
    builder.get("/projects/{id}", |services, ctx| ok(&services.projects.get(ctx.path_id("id")?)?));
    builder.put("/projects/{id}", |services, ctx| {
        ok(&services.projects.update(ctx.path_id("id")?, ctx.body()?)?)
    });
    builder.delete("/projects/{id}", |services, ctx| {
        services.projects.delete(ctx.path_id("id")?)?;
        Ok(HttpResponse::no_content())
    });
    builder.patch("/projects/{id}/status", |services, ctx| {
        let input: StatusInput = ctx.body()?;
        ok(&services.projects.set_status(ctx.path_id("id")?, &input.status)?)
    });
    builder.get("/projects/{id}/sessions", |services, ctx| {
        let now = clock::now();
        let sessions: Vec<_> = services
            .projects
            .sessions(ctx.path_id("id")?)?
            .into_iter()
            .map(|s| SessionView::at(s, now))
            .collect();
        ok(&sessions)
    });
    builder.post("/projects/{id}/sessions", |services, ctx| {
        let project_id = ctx.path_id("id")?;
        let input: SessionInput = ctx.body()?;
        let session = if input.end_time.is_some() {
            services.projects.log_session(project_id, input)?
        } else {
            services.projects.start_session(project_id, input)?
        };
        created(&SessionView::at(session, clock::now()))
    });
    builder.get("/projects/{id}/total-time", |services, ctx| {
        let id = ctx.path_id("id")?;
        let total = services.projects.total_time(id, clock::now())?;
        ok(&json!({ "projectId": id, "totalMinutes": total.num_minutes() }))
    });
    builder.post("/project-sessions/{id}/stop", |services, ctx| {
        let input: StopInput = ctx.body()?;
        let session = services.projects.stop_session(ctx.path_id("id")?, input.end_time()?)?;
        ok(&SessionView::at(session, clock::now()))
    });
}

fn register_session_routes(builder: &mut RouterBuilder) {
    builder.get("/sessions", |services, ctx| {
        let sessions = if live_only(ctx)? {
            services.sessions.live()?
        } else if let Some(task_id) = query_id(ctx, "taskId")? {
            services.sessions.for_task(task_id)?
        } else if let Some(date) = ctx.query("date") {
            services.sessions.on(validation::date(date, "date")?)?
        } else {
            services.sessions.list()?
        };
        let now = clock::now();
        ok(&sessions.into_iter().map(|s| SessionView::at(s, now)).collect::<Vec<_>>())
    });
    // A body with an end time logs a closed session, otherwise a live one starts.
    builder.post("/sessions", |services, ctx| {
        let input: SessionInput = ctx.body()?;
        let session = if input.end_time.is_some() {
            services.sessions.log(input)?
        } else {
            services.sessions.start(input)?
        };
        created(&SessionView::at(session, clock::now()))
    });
    builder.get("/sessions/{id}", |services, ctx| {
        ok(&SessionView::at(services.sessions.get(ctx.path_id("id")?)?, clock::now()))
    });
    builder.delete("/sessions/{id}", |services, ctx| {
        services.sessions.delete(ctx.path_id("id")?)?;
        Ok(HttpResponse::no_content())
    });
    builder.post("/sessions/{id}/stop", |services, ctx| {
        let input: StopInput = ctx.body()?;
        let session = services.sessions.stop(ctx.path_id("id")?, input.end_time()?)?;
        ok(&SessionView::at(session, clock::now()))
    });
}

fn register_goal_routes(builder: &mut RouterBuilder) {
    builder.get("/goals", |services, ctx| {
        let goals = match ctx.query("activeOn") {
            Some(date) => services.goals.active_on(validation::date(date, "activeOn")?)?,
            None => services.goals.list()?,
        };
        ok(&goals.iter().map(goal_json).collect::<AppResult<Vec<_>>>()?)
    });
    builder.post("/goals", |services, ctx| created(&goal_json(&services.goals.create(ctx.body()?)?)?));
    builder.get("/goals/{id}", |services, ctx| ok(&goal_json(&services.goals.get(ctx.path_id("id")?)?)?));
    builder.put("/goals/{id}", |services, ctx| {
        ok(&goal_json(&services.goals.update(ctx.path_id("id")?, ctx.body()?)?)?)
    });
    builder.delete("/goals/{id}", |services, ctx| {
        services.goals.delete(ctx.path_id("id")?)?;
        Ok(HttpResponse::no_content())
    });
    builder.post("/goals/{id}/progress", |services, ctx| {
        let input: ProgressInput = ctx.body()?;
        ok(&goal_json(&services.goals.add_progress(ctx.path_id("id")?, input.amount)?)?)
    });
    builder.post("/goals/{id}/refresh", |services, ctx| {
        ok(&goal_json(&services.goals.refresh_progress(ctx.path_id("id")?)?)?)
    });
}

fn register_reflection_routes(builder: &mut RouterBuilder) {
    builder.get("/reflections", |services, _| ok(&services.reflections.list()?));
    // Upsert by date, so 200 rather than 201.
    builder.post("/reflections", |services, ctx| ok(&services.reflections.write(ctx.body()?)?));
    builder.get("/reflections/{id}", |services, ctx| ok(&services.reflections.get(ctx.path_id("id")?)?));
    builder.delete("/reflections/{id}", |services, ctx| {
        services.reflections.delete(ctx.path_id("id")?)?;
        Ok(HttpResponse::no_content())
    });
    builder.get("/reflections/date/{date}", |services, ctx| {
        let date = validation::date(ctx.path_param("date")?, "date")?;
        ok(&services.reflections.get_by_date(date)?)
    });
}
