//! Round-trips against a live PostgreSQL. Run with
//! `DATABASE_URL=... cargo test -- --ignored --test-threads=1`.

mod common;

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use common::{json_request, register, send, TestDatabase};

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_register_login_and_profile() {
    let db = TestDatabase::new().await;
    db.clean().await;
    let app = db.app();

    let token = register(&app, "runner@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "runner@example.com", "password": "secret123", "name": "Dup"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "runner@example.com", "password": "wrong-password"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "Runner@Example.com", "password": "secret123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["lastLogin"].is_string());
    assert!(body["data"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/auth/profile",
            Some(&token),
            Some(json!({"height": 182.0, "settings": {"notifications": false, "theme": "dark", "units": "metric"}})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["height"], 182.0);
    assert_eq!(body["data"]["name"], "Test User");
    assert_eq!(body["data"]["settings"]["theme"], "dark");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_workout_crud_and_ownership() {
    let db = TestDatabase::new().await;
    db.clean().await;
    let app = db.app();

    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/workouts",
            Some(&owner),
            Some(json!({
                "name": "Chest - Monday",
                "type": "strength",
                "duration": 60,
                "date": "2024-04-01",
                "muscleGroup": "chest",
                "exercises": [{"name": "Bench Press", "sets": 10}],
                "rating": 4
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(
        &app,
        json_request(Method::GET, &format!("/api/workouts/{id}"), Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], body["data"]);

    let (status, _) = send(
        &app,
        json_request(Method::GET, &format!("/api/workouts/{id}"), Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/workouts/{id}"), Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/workouts/{id}"),
            Some(&owner),
            Some(json!({"duration": 75})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["duration"], 75);
    assert_eq!(body["data"]["name"], "Chest - Monday");

    let (_, stats) = send(
        &app,
        json_request(
            Method::GET,
            "/api/workouts/stats?startDate=2024-04-01",
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(stats["data"]["totalWorkouts"], 1);
    assert_eq!(stats["data"]["byMuscleGroup"]["chest"], 1);
    assert_eq!(stats["data"]["averageRating"], 4.0);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/workouts/{id}"), Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/workouts/{}", Uuid::new_v4()),
            Some(&owner),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_single_active_program() {
    let db = TestDatabase::new().await;
    db.clean().await;
    let app = db.app();
    let token = register(&app, "planner@example.com").await;

    let mut ids = Vec::new();
    for name in ["Base", "Build"] {
        let (status, body) = send(
            &app,
            json_request(
                Method::POST,
                "/api/programs",
                Some(&token),
                Some(json!({
                    "name": name,
                    "goal": "endurance",
                    "duration": 2,
                    "schedule": {"monday": [{"name": "Run", "type": "cardio"}], "thursday": [{"name": "Ride", "type": "cardio"}]}
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["isActive"], false);
        assert_eq!(body["data"]["progress"]["totalWorkouts"], 4);
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    for id in &ids {
        let (status, body) = send(
            &app,
            json_request(Method::PUT, &format!("/api/programs/{id}/activate"), Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isActive"], true);
    }

    let (_, list) = send(&app, json_request(Method::GET, "/api/programs", Some(&token), None)).await;
    let active: Vec<_> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["isActive"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], ids[1].as_str());

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/programs/{}/activate", Uuid::new_v4()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, active) = send(&app, json_request(Method::GET, "/api/programs/active", Some(&token), None)).await;
    assert_eq!(active["data"]["id"], ids[1].as_str());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_nutrition_upsert_meals_and_targets() {
    let db = TestDatabase::new().await;
    db.clean().await;
    let app = db.app();
    let token = register(&app, "eater@example.com").await;

    let day = json!({"date": "2024-05-01", "weight": 79.5, "totalCalories": 2100, "meals": []});
    let (status, body) = send(&app, json_request(Method::POST, "/api/nutrition", Some(&token), Some(day.clone()))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["totalCalories"], 2100);

    let (status, _) = send(&app, json_request(Method::POST, "/api/nutrition", Some(&token), Some(day))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/nutrition/2024-05-01/meals",
            Some(&token),
            Some(json!({"name": "Oats", "type": "breakfast", "calories": 350, "protein": 12})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["meals"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["totalCalories"], 350);
    assert_eq!(body["data"]["weight"], 79.5);

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/nutrition/2024-05-02/meals",
            Some(&token),
            Some(json!({"name": "Salad", "type": "lunch", "calories": 420})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["date"], "2024-05-02");

    let (_, weights) = send(&app, json_request(Method::GET, "/api/nutrition/weight-logs", Some(&token), None)).await;
    assert_eq!(weights["count"], 1);
    assert_eq!(weights["data"][0]["weight"], 79.5);

    let (status, _) = send(&app, json_request(Method::GET, "/api/nutrition/profile/targets", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/nutrition/profile",
            Some(&token),
            Some(json!({"height": 180, "targetWeight": 75, "goal": "loss"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, targets) = send(&app, json_request(Method::GET, "/api/nutrition/profile/targets", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(targets["data"]["currentWeight"], 79.5);
    assert_eq!(targets["data"]["bmiCategory"], "normal");

    let (status, _) = send(&app, json_request(Method::DELETE, "/api/nutrition/2024-05-01", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, json_request(Method::GET, "/api/nutrition/2024-05-01", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_program_round_trip_and_ownership() {
    let db = TestDatabase::new().await;
    db.clean().await;
    let app = db.app();

    let owner = register(&app, "coach@example.com").await;
    let intruder = register(&app, "rival@example.com").await;

    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/api/programs",
            Some(&owner),
            Some(json!({
                "name": "Strength Block",
                "description": "Three lifting days",
                "goal": "muscle_gain",
                "level": "intermediate",
                "duration": 52,
                "schedule": {
                    "monday": [{"name": "Push", "type": "strength", "exercises": [{"name": "Bench Press", "sets": 10}]}],
                    "wednesday": [{"name": "Pull", "type": "strength"}],
                    "friday": [{"name": "Legs", "type": "strength"}]
                }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["progress"]["totalWorkouts"], 156);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(
        &app,
        json_request(Method::GET, &format!("/api/programs/{id}"), Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let (status, _) = send(
        &app,
        json_request(Method::GET, &format!("/api/programs/{id}"), Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(Method::PUT, &format!("/api/programs/{id}/activate"), Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/programs/{id}"), Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The longest program still activates with a valid end date
    let (status, activated) = send(
        &app,
        json_request(Method::PUT, &format!("/api/programs/{id}/activate"), Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(activated["data"]["endDate"].is_string());

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/programs/{id}"), Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, &format!("/api/programs/{id}"), Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_nutrition_round_trip_and_ownership() {
    let db = TestDatabase::new().await;
    db.clean().await;
    let app = db.app();

    let owner = register(&app, "cook@example.com").await;
    let intruder = register(&app, "snacker@example.com").await;

    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/api/nutrition",
            Some(&owner),
            Some(json!({
                "date": "2024-06-10",
                "waterIntake": 2.5,
                "notes": "Rest day",
                "meals": [
                    {"name": "Eggs", "type": "breakfast", "calories": 310.4, "protein": 21},
                    {"name": "Rice bowl", "type": "lunch", "calories": 640, "carbs": 90, "time": "12:30"}
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["totalCalories"], 950);

    let (status, fetched) = send(
        &app,
        json_request(Method::GET, "/api/nutrition/2024-06-10", Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/nutrition/2024-06-10", Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, "/api/nutrition/2024-06-10", Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A meal that pushes the day past the ceiling is rejected and nothing changes
    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/nutrition/2024-06-10/meals",
            Some(&owner),
            Some(json!({"name": "Banquet", "type": "dinner", "calories": 99999})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, unchanged) = send(
        &app,
        json_request(Method::GET, "/api/nutrition/2024-06-10", Some(&owner), None),
    )
    .await;
    assert_eq!(unchanged["data"]["meals"].as_array().unwrap().len(), 2);

    let (status, profile) = send(
        &app,
        json_request(
            Method::POST,
            "/api/nutrition/profile",
            Some(&owner),
            Some(json!({"height": 172.5, "targetWeight": 68, "goal": "maintain", "activityLevel": 1.55})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(
        &app,
        json_request(Method::GET, "/api/nutrition/profile", Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], profile["data"]);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/nutrition/profile", Some(&intruder), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request(Method::DELETE, "/api/nutrition/2024-06-10", Some(&owner), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
