use std::time::{Duration, Instant};

use egui_kittest::Harness;
use serde_json::json;
use userdesk_business::{BusinessConfig, Location};
use userdesk_ui::UserDeskApp;
use userdesk_ui::state::State;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestCtx<'a> {
    mock_server: MockServer,
    harness: Harness<'a, UserDeskApp>,
}

impl<'a> TestCtx<'a> {
    /// Starts the app at `href` against `mock_server`. Mount the mocks the
    /// first frame needs before calling this.
    pub fn new(mock_server: MockServer, href: &str) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let state = State::new(BusinessConfig::new(mock_server.uri()), Location::parse(href));
        let app = UserDeskApp::new(state);
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, UserDeskApp> {
        &mut self.harness
    }

    pub fn harness(&self) -> &Harness<'a, UserDeskApp> {
        &self.harness
    }

    pub fn location(&self) -> &Location {
        self.harness.state().state().ctx.state::<Location>()
    }

    /// Steps frames until no request is in flight, then renders the result.
    pub async fn settle(&mut self) {
        let start = Instant::now();
        loop {
            self.harness.step();
            let ctx = &mut self.harness.state_mut().state_mut().ctx;
            if ctx.task_count() == 0 {
                break;
            }
            assert!(
                start.elapsed() < SETTLE_TIMEOUT,
                "Timed out with {} requests in flight",
                ctx.task_count()
            );
            while ctx.task_set_mut().join_next().await.is_some() {}
        }
        // One frame to apply results, one to render them.
        self.harness.step();
        self.harness.step();
    }

    /// Requests the mock server saw for `verb route`.
    pub async fn hits(&self, verb: &str, route: &str) -> usize {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.method.as_str() == verb && req.url.path() == route)
            .count()
    }
}

pub fn user_json(id: &str, name: &str, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "email": email,
        "createdAt": "2024-01-01T12:00:00Z",
        "updatedAt": "2024-01-02T12:00:00Z"
    })
}

pub async fn mock_list(server: &MockServer, users: Vec<serde_json::Value>) {
    let total = users.len();
    Mock::given(method("GET"))
        .and(path("/api/v1/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "users": users, "total": total })),
        )
        .mount(server)
        .await;
}

pub async fn mock_user(server: &MockServer, user: serde_json::Value) {
    let id = user["id"].as_str().unwrap_or_default().to_owned();
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/users/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user))
        .mount(server)
        .await;
}

pub async fn mock_status(server: &MockServer, verb: &str, route: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mock_error(server: &MockServer, verb: &str, route: &str, status: u16, message: &str) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "message": message })))
        .mount(server)
        .await;
}
