mod common;

use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, decode_header};
use serde_json::json;
use tower::ServiceExt;

use common::{
    ADMIN_PASSWORD, ADMIN_USERNAME, TEACHER_PASSWORD, TEACHER_USERNAME, json_body, jwt_config,
    keys, request, setup_test_app,
};
use courseway_auth::{TOKEN_LIFETIME_SECS, verify_token};

fn login(username: &str, password: &str) -> axum::http::Request<axum::body::Body> {
    request(
        "POST",
        "/api/v1/auth",
        None,
        Some(json!({ "username": username, "password": password })),
    )
}

#[tokio::test]
async fn test_login_success_issues_twelve_hour_token() {
    let app = setup_test_app();

    let response = app
        .oneshot(login(ADMIN_USERNAME, ADMIN_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["username"], ADMIN_USERNAME);
    assert!(body.get("password").is_none());

    let token = body["token"].as_str().unwrap();
    assert_eq!(decode_header(token).unwrap().alg, Algorithm::HS256);

    let claims = verify_token(token, &jwt_config()).unwrap();
    assert_eq!(claims.uname, ADMIN_USERNAME);
    assert_eq!(claims.exp, claims.iat + TOKEN_LIFETIME_SECS);
    assert_eq!(body["expires"], claims.exp);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = setup_test_app();

    let response = app
        .oneshot(login(ADMIN_USERNAME, "not-the-password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert!(body.get("token").is_none());
    assert_eq!(body["title"], "401 Unauthorized");
    assert_eq!(body["message"], "Invalid password.");
    assert_eq!(keys(&body), vec!["description", "message", "title"]);
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = setup_test_app();

    let response = app.oneshot(login("ghost", "whatever")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["message"], "User not found.");
}

#[tokio::test]
async fn test_login_requires_administrator() {
    let app = setup_test_app();

    let response = app
        .oneshot(login(TEACHER_USERNAME, TEACHER_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["message"], "User must be an administrator.");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_login_validation() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(request("POST", "/api/v1/auth", None, Some(json!({}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "[username]: This field is missing. | [password]: This field is missing."
    );

    let response = app
        .oneshot(login("", ADMIN_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "[username]: This value should not be blank.");
}

#[tokio::test]
async fn test_login_malformed_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/v1/auth")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{\"username\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["title"], "400 Bad Request");
}
