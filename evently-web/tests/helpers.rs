//! Integration test helpers
//!
//! Spawns the full application on a random port backed by an in-memory
//! SQLite database and drives it over HTTP.

#![allow(dead_code)]

use evently_core::{BootstrapAdmin, EventlyConfig};
use serde_json::{json, Value};
use std::sync::LazyLock;
use tokio::net::TcpListener;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

// Initialize tracing only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

/// Running application under test
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_register(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url("/api/auth/register"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, body: &Value) -> reqwest::Response {
        self.api_client
            .post(self.url("/api/auth/login"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_event(&self, token: Option<&str>, body: &Value) -> reqwest::Response {
        let mut request = self.api_client.post(self.url("/api/events")).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// RSVP with an optional token and an optional JSON body
    pub async fn post_rsvp(
        &self,
        event_id: i64,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(self.url(&format!("/api/rsvps/event/{event_id}")));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn get_rsvps(&self, event_id: i64) -> reqwest::Response {
        self.get(&format!("/api/rsvps/event/{event_id}")).await
    }

    /// Log in and return the access token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post_login(&json!({ "username": username, "password": password }))
            .await;
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.unwrap();
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Register a fresh user and return `(token, user_id)`
    pub async fn register_and_login(&self) -> (String, i64) {
        let user = TestUser::generate();
        let response = self.post_register(&user.to_json()).await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        let user_id = body["user"]["id"].as_i64().unwrap();
        (self.login(&user.username, &user.password).await, user_id)
    }

    /// Create an event as admin and return its id
    pub async fn create_event(&self, body: Value) -> i64 {
        let token = self.admin_token().await;
        let mut payload = json!({ "title": "Test event", "date": "2030-01-15T18:00:00" });
        if let (Some(payload), Some(extra)) = (payload.as_object_mut(), body.as_object()) {
            payload.extend(extra.clone());
        }

        let response = self.post_event(Some(&token), &payload).await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }
}

/// Spawn the application with a bootstrap admin account
pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let mut config = EventlyConfig::default();
    config.server.port = 0;
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.bootstrap_admin = Some(BootstrapAdmin {
        username: ADMIN_USERNAME.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    });

    let state = evently_web::AppState::new(config).await.unwrap();
    let app = evently_web::create_app(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: reqwest::Client::new(),
    }
}

/// Test user data
pub struct TestUser {
    pub username: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            username: format!("test_user_{}", &id[..8]),
            password: "test_password_123".to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "username": self.username,
            "password": self.password
        })
    }
}
