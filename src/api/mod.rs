// API routes and handlers

use sqlx::PgPool;

use crate::auth::AuthService;

pub mod auth;
pub mod health;
pub mod nutrition;
pub mod programs;
pub mod routes;
pub mod workouts;

/// Shared state for every authenticated router
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
}
