use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::AppState;
use crate::auth::{jwt_auth_middleware, UserSession};
use crate::error::ApiError;
use crate::models::{
    ApiResponse, CreateWorkoutRequest, DateRangeQuery, UpdateWorkoutRequest, Workout, WorkoutQuery,
};
use crate::services::WorkoutService;
use crate::stats::WorkoutStats;

const WORKOUT_NOT_FOUND: &str = "Workout not found";

pub fn workout_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/stats", get(workout_stats))
        .route(
            "/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn list_workouts(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<WorkoutQuery>, ApiError>,
) -> Result<Json<ApiResponse<Vec<Workout>>>, ApiError> {
    let workouts = WorkoutService::new(state.db.clone())
        .list_workouts(session.user_id, &query)
        .await?;

    Ok(Json(ApiResponse::list(workouts)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateWorkoutRequest>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<Workout>>), ApiError> {
    let workout = request.validate()?;

    let created = WorkoutService::new(state.db.clone())
        .create_workout(session.user_id, workout)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn workout_stats(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(range), _): WithRejection<Query<DateRangeQuery>, ApiError>,
) -> Result<Json<ApiResponse<WorkoutStats>>, ApiError> {
    let workouts = WorkoutService::new(state.db.clone())
        .workouts_in_range(session.user_id, range)
        .await?;

    Ok(Json(ApiResponse::ok(WorkoutStats::from_workouts(&workouts))))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %id))]
async fn get_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<ApiResponse<Workout>>, ApiError> {
    let workout = WorkoutService::new(state.db.clone())
        .get_workout(session.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))?;

    Ok(Json(ApiResponse::ok(workout)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %id))]
async fn update_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateWorkoutRequest>, ApiError>,
) -> Result<Json<ApiResponse<Workout>>, ApiError> {
    let request = request.validate()?;

    let workout = WorkoutService::new(state.db.clone())
        .update_workout(session.user_id, id, request)
        .await?
        .ok_or_else(|| ApiError::not_found(WORKOUT_NOT_FOUND))?;

    Ok(Json(ApiResponse::ok(workout)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, workout_id = %id))]
async fn delete_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = WorkoutService::new(state.db.clone())
        .delete_workout(session.user_id, id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found(WORKOUT_NOT_FOUND));
    }

    Ok(Json(ApiResponse::message("Workout deleted successfully")))
}
