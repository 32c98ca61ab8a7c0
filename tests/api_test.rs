mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{json_request, offline_app, send, test_config, TEST_SECRET};
use fittrack::auth::JwtService;

fn valid_token() -> String {
    JwtService::new(TEST_SECRET, Duration::hours(1))
        .create_token(Uuid::new_v4())
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = offline_app(&test_config());
    let (status, body) = send(&app, json_request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_returns_not_found_envelope() {
    let app = offline_app(&test_config());
    let (status, body) = send(&app, json_request(Method::GET, "/api/unknown", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Not found - /api/unknown");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = offline_app(&test_config());
    let response = app
        .oneshot(json_request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = offline_app(&test_config());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/workouts")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = offline_app(&test_config());

    for uri in [
        "/api/auth/me",
        "/api/workouts",
        "/api/workouts/stats",
        "/api/programs/active",
        "/api/nutrition",
        "/api/nutrition/profile/targets",
    ] {
        let (status, body) = send(&app, json_request(Method::GET, uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["message"], "Not authorized, no token", "{uri}");
    }
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = offline_app(&test_config());
    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/workouts", Some("not.a.jwt"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let app = offline_app(&test_config());
    let foreign = JwtService::new("some-other-secret", Duration::hours(1))
        .create_token(Uuid::new_v4())
        .unwrap();

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/programs", Some(&foreign), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = offline_app(&test_config());
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "a@b.com", "password": "secret123"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide all required fields");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = offline_app(&test_config());
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/auth/login", None, Some(json!({"email": "a@b.com"}))),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email and password");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = offline_app(&test_config());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/workouts")
        .header(header::AUTHORIZATION, format!("Bearer {}", valid_token()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": \"Leg day\","))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_workout_missing_fields() {
    let app = offline_app(&test_config());
    let token = valid_token();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/workouts",
            Some(&token),
            Some(json!({"name": "Leg day"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide name, duration and type");
}

#[tokio::test]
async fn test_create_program_missing_fields() {
    let app = offline_app(&test_config());
    let token = valid_token();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/programs",
            Some(&token),
            Some(json!({"name": "Starter", "goal": "endurance"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide name, goal and schedule");
}

#[tokio::test]
async fn test_add_meal_missing_fields() {
    let app = offline_app(&test_config());
    let token = valid_token();
    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/nutrition/2024-05-01/meals",
            Some(&token),
            Some(json!({"calories": 300})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide meal name and type");
}

#[tokio::test]
async fn test_invalid_path_parameters() {
    let app = offline_app(&test_config());
    let token = valid_token();

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/workouts/not-a-uuid", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/nutrition/2024-13-45", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_activity_level_out_of_range() {
    let app = offline_app(&test_config());
    let token = valid_token();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/nutrition/profile",
            Some(&token),
            Some(json!({"height": 180, "targetWeight": 75, "activityLevel": 2.4})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Activity level must be between 1.2 and 1.9");
}

#[tokio::test]
async fn test_rate_limit_returns_too_many_requests() {
    let config = fittrack::config::AppConfig {
        rate_limit_max: 2,
        ..test_config()
    };
    let app = offline_app(&config);

    for _ in 0..2 {
        let (status, _) = send(&app, json_request(Method::GET, "/api/workouts", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = send(&app, json_request(Method::GET, "/api/workouts", None, None)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);

    // Health sits outside /api
    let (status, _) = send(&app, json_request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rotating_forwarded_for_does_not_bypass_rate_limit() {
    let config = fittrack::config::AppConfig {
        rate_limit_max: 2,
        ..test_config()
    };
    let app = offline_app(&config);

    let mut statuses = Vec::new();
    for n in 0..3 {
        let mut request = json_request(Method::GET, "/api/workouts", None, None);
        request.headers_mut().insert(
            "x-forwarded-for",
            format!("203.0.113.{n}").parse().unwrap(),
        );
        let (status, _) = send(&app, request).await;
        statuses.push(status);
    }

    assert_eq!(
        statuses,
        vec![
            StatusCode::UNAUTHORIZED,
            StatusCode::UNAUTHORIZED,
            StatusCode::TOO_MANY_REQUESTS
        ]
    );
}
