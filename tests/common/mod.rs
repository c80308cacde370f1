//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use logcentral::{
    api::{build_router, ApiState},
    auth::{create_account, AccountCreation, Identity, PasswordHasher, Role, User},
    config::AuthConfig,
    domain::{LogChannel, LogLevel},
    services::CreateLogRequest,
    storage::{self, DbPool, SqlxUserRepository},
};
use mockable::Clock;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Clock pinned to a fixed instant that tests advance by hand.
pub struct FixtureClock(Mutex<DateTime<Utc>>);

impl FixtureClock {
    pub fn new() -> Arc<Self> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("valid instant");
        Arc::new(Self(Mutex::new(start)))
    }

    pub fn advance(&self, seconds: i64) {
        *self.0.lock().expect("clock lock") += TimeDelta::seconds(seconds);
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

pub struct TestApp {
    pub pool: DbPool,
    pub state: ApiState,
    pub clock: Arc<FixtureClock>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Insert an account directly, bypassing the role restrictions of the
    /// public workflows.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        let repository = SqlxUserRepository::new(self.pool.clone());
        let hasher = PasswordHasher::default();
        match create_account(&repository, &hasher, self.clock.as_ref(), name, email, password, role)
            .await
            .expect("seed user")
        {
            AccountCreation::Created(user) => user,
            AccountCreation::EmailTaken => panic!("email {email} already seeded"),
        }
    }

    pub async fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(&identity_of(user)).expect("issue token")
    }
}

pub fn identity_of(user: &User) -> Identity {
    Identity::new(user.id, user.name.clone(), user.email.clone(), user.role)
}

pub async fn setup_test_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("create sqlite pool");

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.expect("enable foreign keys");
    storage::run_migrations(&pool).await.expect("run migrations for tests");

    let clock = FixtureClock::new();
    let auth = AuthConfig::with_secret(TEST_SECRET);
    let state =
        ApiState::from_pool(pool.clone(), &auth, clock.clone()).expect("build api state");

    TestApp { pool, state, clock }
}

pub fn log_request(title: &str, owner: Option<logcentral::domain::UserId>) -> CreateLogRequest {
    CreateLogRequest {
        title: title.to_string(),
        description: format!("{title} description"),
        details: "stack trace".to_string(),
        source: "10.0.0.1".to_string(),
        event_count: 1,
        level: LogLevel::Error,
        channel: LogChannel::Production,
        user_id: owner,
    }
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = app.router().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
