//! Mock-server helpers for exercising the users commands end to end.
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_list_users(vec![sample_user("1")], 1).await;
//!
//! ensure_user_list(&mut test_ctx.ctx);
//! test_ctx.flush_and_wait().await;
//! ```

use std::time::Duration;

use serde_json::json;
use userdesk_states::StateCtx;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use crate::{BusinessConfig, Location, register_users};

pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::at(Location::default()).await
    }

    pub async fn at(location: Location) -> Self {
        let mock_server = MockServer::start().await;
        let mut ctx = StateCtx::new();
        register_users(&mut ctx, BusinessConfig::new(mock_server.uri()), location);
        ctx.sync_computes();

        Self { mock_server, ctx }
    }

    /// Sync, flush queued commands, then wait for every spawned task,
    /// syncing after each one completes.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        while self.ctx.task_count() > 0 {
            assert!(
                start.elapsed() < timeout,
                "Timed out waiting for pending tasks ({} still running)",
                self.ctx.task_count()
            );
            if self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }

        self.ctx.sync_computes();
    }

    /// Number of requests the mock server saw for `method path`.
    pub async fn hits(&self, verb: &str, route: &str) -> usize {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.method.as_str() == verb && req.url.path() == route)
            .count()
    }

    pub async fn mock_list_users(&self, users: Vec<serde_json::Value>, total: u64) {
        Mock::given(method("GET"))
            .and(path("/api/v1/users"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "users": users, "total": total })),
            )
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_get_user(&self, user: serde_json::Value) {
        let id = user["id"].as_str().unwrap_or_default().to_owned();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/users/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_status(&self, verb: &str, route: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_error(&self, verb: &str, route: &str, status: u16, message: &str) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
            .mount(&self.mock_server)
            .await;
    }
}

pub fn sample_user(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("user{id}@example.com"),
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}
