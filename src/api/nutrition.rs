use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;

use super::AppState;
use crate::auth::{jwt_auth_middleware, AuthError, UserSession};
use crate::error::ApiError;
use crate::models::{
    AddMealRequest, ApiResponse, DateRangeQuery, NutritionLog, NutritionProfile,
    UpsertNutritionLogRequest, UpsertNutritionProfileRequest, WeightLogEntry,
    MISSING_PROFILE_FIELDS,
};
use crate::services::nutrition_profile_service::NewNutritionProfile;
use crate::services::{NutritionProfileService, NutritionService, UserService};
use crate::stats::{calculate_targets, BodyMetrics, CalculatorError, NutritionStats, NutritionTargets};

const LOG_NOT_FOUND: &str = "Nutrition log not found for this date";
const PROFILE_NOT_FOUND: &str = "Nutrition profile not found";

pub fn nutrition_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_logs).post(upsert_log))
        .route("/stats", get(nutrition_stats))
        .route("/weight-logs", get(weight_logs))
        .route("/profile", get(get_profile).post(upsert_profile))
        .route("/profile/targets", get(profile_targets))
        .route("/:date", get(get_log).delete(delete_log))
        .route("/:date/meals", put(add_meal))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn list_logs(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(range), _): WithRejection<Query<DateRangeQuery>, ApiError>,
) -> Result<Json<ApiResponse<Vec<NutritionLog>>>, ApiError> {
    let logs = NutritionService::new(state.db.clone())
        .list_logs(session.user_id, range)
        .await?;

    Ok(Json(ApiResponse::list(logs)))
}

/// 201 when the day's log was created, 200 when it replaced an existing one
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn upsert_log(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<UpsertNutritionLogRequest>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<NutritionLog>>), ApiError> {
    let day = request.validate()?;

    let (log, created) = NutritionService::new(state.db.clone())
        .upsert_log(session.user_id, day)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::ok(log))))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn nutrition_stats(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(range), _): WithRejection<Query<DateRangeQuery>, ApiError>,
) -> Result<Json<ApiResponse<NutritionStats>>, ApiError> {
    let logs = NutritionService::new(state.db.clone())
        .list_logs(session.user_id, range)
        .await?;

    Ok(Json(ApiResponse::ok(NutritionStats::from_logs(&logs))))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn weight_logs(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ApiResponse<Vec<WeightLogEntry>>>, ApiError> {
    let entries = NutritionService::new(state.db.clone())
        .weight_logs(session.user_id)
        .await?;

    Ok(Json(ApiResponse::list(entries)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %date))]
async fn get_log(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(date), _): WithRejection<Path<NaiveDate>, ApiError>,
) -> Result<Json<ApiResponse<NutritionLog>>, ApiError> {
    let log = NutritionService::new(state.db.clone())
        .get_log_by_date(session.user_id, date)
        .await?
        .ok_or_else(|| ApiError::not_found(LOG_NOT_FOUND))?;

    Ok(Json(ApiResponse::ok(log)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %date))]
async fn add_meal(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(date), _): WithRejection<Path<NaiveDate>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<AddMealRequest>, ApiError>,
) -> Result<Json<ApiResponse<NutritionLog>>, ApiError> {
    let meal = request.validate()?;

    let log = NutritionService::new(state.db.clone())
        .add_meal(session.user_id, date, meal)
        .await?;

    Ok(Json(ApiResponse::ok(log)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %date))]
async fn delete_log(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(date), _): WithRejection<Path<NaiveDate>, ApiError>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = NutritionService::new(state.db.clone())
        .delete_log(session.user_id, date)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Nutrition log not found"));
    }

    Ok(Json(ApiResponse::message("Nutrition log deleted successfully")))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ApiResponse<NutritionProfile>>, ApiError> {
    let profile = NutritionProfileService::new(state.db.clone())
        .get_profile(session.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    Ok(Json(ApiResponse::ok(profile)))
}

/// 201 on first save, 200 afterwards
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn upsert_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<UpsertNutritionProfileRequest>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<NutritionProfile>>), ApiError> {
    let request = request.validate()?;
    let profiles = NutritionProfileService::new(state.db.clone());

    if let Some(updated) = profiles.update_profile(session.user_id, &request).await? {
        return Ok((StatusCode::OK, Json(ApiResponse::ok(updated))));
    }

    let new_profile = NewNutritionProfile::from_request(&request)
        .ok_or_else(|| ApiError::validation(MISSING_PROFILE_FIELDS))?;
    let created = profiles.create_profile(session.user_id, new_profile).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// BMI, BMR and calorie targets from the profile and the latest known weight
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn profile_targets(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ApiResponse<NutritionTargets>>, ApiError> {
    let profile = NutritionProfileService::new(state.db.clone())
        .get_profile(session.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    let user = UserService::new(state.db.clone())
        .get_user_by_id(session.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let logged_weight = NutritionService::new(state.db.clone())
        .latest_weight(session.user_id)
        .await?;
    let current_weight = logged_weight
        .or(user.weight)
        .ok_or(CalculatorError::MissingWeight)?;

    let metrics = BodyMetrics {
        weight_kg: current_weight,
        height_cm: profile.height,
        age_years: user.age,
        sex: user.gender,
    };
    let targets = calculate_targets(
        &metrics,
        profile.target_weight,
        profile.activity_level,
        profile.goal,
    )?;

    Ok(Json(ApiResponse::ok(targets)))
}
