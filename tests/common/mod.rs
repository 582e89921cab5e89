#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;

use courseway::router::init_router;
use courseway::state::AppState;
use courseway_auth::issue_token;
use courseway_config::{AuthGateConfig, CorsConfig, JwtConfig, ServerConfig};
use courseway_core::hash_password_with_cost;
use courseway_lms::{Fixture, FixtureCategory, FixtureCourse, InMemoryLms, UserAccount};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ADMIN_ID: i64 = 1;
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const TEACHER_ID: i64 = 2;
pub const TEACHER_USERNAME: &str = "teacher";
pub const TEACHER_PASSWORD: &str = "teacher-password";
pub const COURSE_CODE: &str = "ALGEBRA";

fn account(id: i64, username: &str, password: &str, is_admin: bool) -> UserAccount {
    UserAccount {
        id,
        username: username.to_string(),
        firstname: "Test".to_string(),
        lastname: "User".to_string(),
        email: Some(format!("{}@example.org", username)),
        status: if is_admin { 1 } else { 5 },
        is_admin,
        // cost 4 keeps the suite fast
        password_hash: hash_password_with_cost(password, 4).unwrap(),
    }
}

pub fn fixture() -> Fixture {
    Fixture {
        users: vec![
            account(ADMIN_ID, ADMIN_USERNAME, ADMIN_PASSWORD, true),
            account(TEACHER_ID, TEACHER_USERNAME, TEACHER_PASSWORD, false),
        ],
        categories: vec![FixtureCategory {
            code: "MATH".to_string(),
            name: "Mathematics".to_string(),
            parent_code: None,
        }],
        courses: vec![FixtureCourse {
            code: COURSE_CODE.to_string(),
            title: "Algebra".to_string(),
            category_code: Some("MATH".to_string()),
            visibility: 2,
            course_language: "english".to_string(),
            teachers: vec![TEACHER_ID],
        }],
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
    }
}

pub fn test_state() -> AppState {
    AppState {
        lms: Arc::new(InMemoryLms::from_fixture(fixture())),
        jwt_config: jwt_config(),
        gate_config: AuthGateConfig::default(),
        server_config: ServerConfig::default(),
        cors_config: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

pub fn setup_test_app() -> Router {
    init_router(test_state())
}

pub fn admin_token() -> String {
    issue_token(ADMIN_USERNAME, ADMIN_ID, &jwt_config())
        .unwrap()
        .token
}

pub fn teacher_token() -> String {
    issue_token(TEACHER_USERNAME, TEACHER_ID, &jwt_config())
        .unwrap()
        .token
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

/// Keys of an error body, sorted.
pub fn keys(body: &Value) -> Vec<String> {
    let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}
