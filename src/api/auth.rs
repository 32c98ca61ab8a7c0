use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use super::AppState;
use crate::auth::{jwt_auth_middleware, AuthError, LoginRequest, RegisterRequest, UserSession};
use crate::error::ApiError;
use crate::models::{ApiResponse, UpdateProfileRequest, User};
use crate::services::UserService;

/// Authentication routes
pub fn auth_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(get_profile))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
        .with_state(state)
}

/// Register a new user
#[tracing::instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let outcome = state.auth_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(outcome.user).with_token(outcome.token)),
    ))
}

/// Login user
#[tracing::instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let outcome = state.auth_service.login(request).await?;

    Ok(Json(ApiResponse::ok(outcome.user).with_token(outcome.token)))
}

/// Current user
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.auth_service.current_user(session.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Partial profile update
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let request = request.validate()?;

    let user = UserService::new(state.db.clone())
        .update_profile(session.user_id, request)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(
        ApiResponse::ok(user).with_message("Profile updated successfully"),
    ))
}

/// Tokens are stateless; the client drops its copy.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn logout(Extension(session): Extension<UserSession>) -> Json<ApiResponse<()>> {
    tracing::info!(jti = %session.jti, "user logged out");
    Json(ApiResponse::message("Logged out successfully"))
}
