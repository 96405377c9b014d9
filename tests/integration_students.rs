mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{bearer_token, response_json, setup_test_app};
use rollbook::modules::auth::model::Role;
use serde_json::json;
use tower::ServiceExt;

fn teacher_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", bearer_token(Role::Teacher)))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_get_students_requires_token() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/students")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_students_rejects_student_token() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/students")
                .header("Authorization", format!("Bearer {}", bearer_token(Role::Student)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Access denied. Teacher privileges required.");
}

#[tokio::test]
async fn test_create_student_invalid_email() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(teacher_request(
            "POST",
            "/students",
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "not-an-email",
                "password": "Passw0rd",
                "date_of_birth": "1995-12-10T00:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Email is invalid");
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn test_create_student_weak_password() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(teacher_request(
            "POST",
            "/students",
            json!({
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "password": "weak",
                "date_of_birth": "1995-12-10T00:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Password is invalid");
}

#[tokio::test]
async fn test_create_student_missing_field() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(teacher_request(
            "POST",
            "/students",
            json!({
                "last_name": "Lovelace",
                "email": "ada@example.com",
                "password": "Passw0rd",
                "date_of_birth": "1995-12-10T00:00:00Z"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "first_name is required");
}

#[tokio::test]
async fn test_create_student_requires_teacher() {
    let (app, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/students")
                .header("content-type", "application/json")
                .header("Authorization", format!("Bearer {}", bearer_token(Role::Student)))
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
