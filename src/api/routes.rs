use std::time::Duration;

use anyhow::Result;
use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::health::health_check;
use super::nutrition::nutrition_routes;
use super::programs::program_routes;
use super::workouts::workout_routes;
use super::AppState;
use crate::auth::{cors_layer, rate_limit_middleware, security_headers_layer, AuthService, RateLimiter};
use crate::config::AppConfig;
use crate::models::ApiResponse;

pub fn create_routes(db: PgPool, config: &AppConfig) -> Result<Router> {
    let auth_service = AuthService::new(db.clone(), &config.jwt_secret, config.jwt_expires_in);
    let state = AppState { db, auth_service };

    let rate_limiter = RateLimiter::new(
        config.rate_limit_max,
        Duration::from_secs(config.rate_limit_window_secs),
    )
    .trusting_proxy(config.trust_proxy);

    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/workouts", workout_routes(state.clone()))
        .nest("/programs", program_routes(state.clone()))
        .nest("/nutrition", nutrition_routes(state))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback(not_found)
        .layer(security_headers_layer())
        .layer(cors_layer(&config.client_url)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::failure(format!("Not found - {}", uri.path()))),
    )
}
