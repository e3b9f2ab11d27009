#[cfg(test)]
mod tests {
    use reqwest::{Client, RequestBuilder, StatusCode};
    use serde_json::{json, Value};
    use studydesk::api::server::Server;
    use studydesk::db::db::Db;
    use studydesk::services::Services;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use tokio::net::TcpListener;

    const TOKEN: &str = "s3cret";

    /// A server on an ephemeral port over a fresh database.
    struct ApiTestContext {
        _temp_dir: TempDir,
        base_url: String,
        client: Client,
    }

    impl AsyncTestContext for ApiTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("studydesk.db")).unwrap();
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());

            let server = Server::new(Services::new(db), Some(TOKEN.to_string()));
            tokio::spawn(async move { server.run(listener).await });

            ApiTestContext {
                _temp_dir: temp_dir,
                base_url,
                client: Client::new(),
            }
        }
    }

    impl ApiTestContext {
        fn get(&self, path: &str) -> RequestBuilder {
            self.client.get(format!("{}{}", self.base_url, path)).bearer_auth(TOKEN)
        }

        fn post(&self, path: &str, body: Value) -> RequestBuilder {
            self.client
                .post(format!("{}{}", self.base_url, path))
                .bearer_auth(TOKEN)
                .json(&body)
        }

        fn delete(&self, path: &str) -> RequestBuilder {
            self.client.delete(format!("{}{}", self.base_url, path)).bearer_auth(TOKEN)
        }
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_health(ctx: &mut ApiTestContext) {
        let response = ctx.get("/health").send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "UP");
        assert_eq!(body["name"], "studydesk");
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_token_is_required(ctx: &mut ApiTestContext) {
        let missing = ctx.client.get(format!("{}/tasks", ctx.base_url)).send().await.unwrap();
        assert_eq!(missing.status(), StatusCode::FORBIDDEN);
        let body: Value = missing.json().await.unwrap();
        assert_eq!(body["errorCode"], "SECURITY_UNAUTHORIZED");

        let wrong = ctx
            .client
            .get(format!("{}/tasks", ctx.base_url))
            .bearer_auth("guess")
            .send()
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::FORBIDDEN);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_validation_error_envelope(ctx: &mut ApiTestContext) {
        let response = ctx.post("/tasks", json!({})).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errorCode"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["field"], "title");
        assert_eq!(body["details"]["code"], "TASK_TITLE_REQUIRED");
        assert!(body["message"].is_string());
        assert!(body["timestamp"].is_string());
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_not_found_and_unknown_route(ctx: &mut ApiTestContext) {
        let response = ctx.get("/tasks/4242").send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errorCode"], "TASK_NOT_FOUND");
        assert_eq!(body["details"]["id"], 4242);

        let response = ctx.get("/nowhere").send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["errorCode"], "ROUTE_NOT_FOUND");

        let response = ctx.delete("/tasks").send().await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = ctx.get("/tasks/abc").send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_task_lifecycle(ctx: &mut ApiTestContext) {
        let response = ctx
            .post("/tasks", json!({ "title": "Read Ch.1", "priority": "HIGH", "deadline": "2026-03-01" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let task: Value = response.json().await.unwrap();
        let id = task["id"].as_i64().unwrap();
        assert_eq!(task["status"], "PENDING");
        assert_eq!(task["priority"], "HIGH");

        let list: Value = ctx.get("/tasks?due=2026-03-01").send().await.unwrap().json().await.unwrap();
        assert_eq!(list.as_array().unwrap().len(), 1);

        let response = ctx
            .post(
                &format!("/tasks/{}/complete", id),
                json!({ "startTime": "2026-03-01 09:00:00", "endTime": "2026-03-01 10:00:00" }),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["task"]["status"], "DONE");
        assert_eq!(body["session"]["durationMinutes"], 60);

        let response = ctx.delete(&format!("/tasks/{}", id)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = ctx.get(&format!("/tasks/{}", id)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_goal_progress_route(ctx: &mut ApiTestContext) {
        let goal: Value = ctx
            .post(
                "/goals",
                json!({ "title": "Ten sessions", "startDate": "2026-03-01", "endDate": "2026-03-31", "target": 10 }),
            )
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = goal["id"].as_i64().unwrap();
        assert_eq!(goal["achieved"], false);

        let response = ctx
            .post(&format!("/goals/{}/progress", id), json!({ "amount": 10 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let goal: Value = response.json().await.unwrap();
        assert_eq!(goal["progress"], 10);
        assert_eq!(goal["achieved"], true);
        assert_eq!(goal["percent"], 100);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_category_lookup_by_encoded_name(ctx: &mut ApiTestContext) {
        for name in ["Data Science", "Café"] {
            let response = ctx.post("/categories", json!({ "name": name })).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let found: Value = ctx.get("/categories?name=Data%20Science").send().await.unwrap().json().await.unwrap();
        assert_eq!(found[0]["name"], "Data Science");

        let found: Value = ctx.get("/categories?name=Data+Science").send().await.unwrap().json().await.unwrap();
        assert_eq!(found[0]["name"], "Data Science");

        let found: Value = ctx.get("/categories?name=Caf%C3%A9").send().await.unwrap().json().await.unwrap();
        assert_eq!(found[0]["name"], "Café");
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_live_session_filter(ctx: &mut ApiTestContext) {
        let response = ctx
            .post("/sessions", json!({ "startTime": "2026-03-01 09:00:00", "endTime": "2026-03-01 10:00:00" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let response = ctx.post("/sessions", json!({})).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        for (query, expected) in [("?live", 1), ("?live=true", 1), ("?live=false", 2), ("", 2)] {
            let list: Value = ctx.get(&format!("/sessions{}", query)).send().await.unwrap().json().await.unwrap();
            assert_eq!(list.as_array().unwrap().len(), expected, "GET /sessions{}", query);
        }

        let response = ctx.get("/sessions?live=maybe").send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test_context(ApiTestContext)]
    #[tokio::test]
    async fn test_project_session_with_end_time_is_logged(ctx: &mut ApiTestContext) {
        let project: Value = ctx
            .post("/projects", json!({ "name": "Thesis" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = project["id"].as_i64().unwrap();

        let response = ctx
            .post(
                &format!("/projects/{}/sessions", id),
                json!({ "startTime": "2026-03-01 09:00:00", "endTime": "2026-03-01 09:45:00" }),
            )
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let session: Value = response.json().await.unwrap();
        assert_eq!(session["endTime"], "2026-03-01T09:45:00");
        assert_eq!(session["durationMinutes"], 45);

        let total: Value = ctx
            .get(&format!("/projects/{}/total-time", id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(total["totalMinutes"], 45);
    }
}
