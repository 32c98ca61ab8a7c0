use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use super::AppState;
use crate::auth::{jwt_auth_middleware, UserSession};
use crate::error::ApiError;
use crate::models::{ApiResponse, CreateProgramRequest, Program, UpdateProgramRequest};
use crate::services::ProgramService;

const PROGRAM_NOT_FOUND: &str = "Program not found";

pub fn program_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_programs).post(create_program))
        .route("/active", get(active_program))
        .route(
            "/:id",
            get(get_program).put(update_program).delete(delete_program),
        )
        .route("/:id/activate", put(activate_program))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
        .with_state(state)
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn list_programs(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ApiResponse<Vec<Program>>>, ApiError> {
    let programs = ProgramService::new(state.db.clone())
        .list_programs(session.user_id)
        .await?;

    Ok(Json(ApiResponse::list(programs)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn create_program(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<CreateProgramRequest>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<Program>>), ApiError> {
    let program = request.validate()?;

    let created = ProgramService::new(state.db.clone())
        .create_program(session.user_id, program)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
async fn active_program(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<ApiResponse<Program>>, ApiError> {
    let program = ProgramService::new(state.db.clone())
        .get_active_program(session.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("No active program"))?;

    Ok(Json(ApiResponse::ok(program)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, program_id = %id))]
async fn get_program(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<ApiResponse<Program>>, ApiError> {
    let program = ProgramService::new(state.db.clone())
        .get_program(session.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    Ok(Json(ApiResponse::ok(program)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, program_id = %id))]
async fn update_program(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProgramRequest>, ApiError>,
) -> Result<Json<ApiResponse<Program>>, ApiError> {
    let request = request.validate()?;

    let program = ProgramService::new(state.db.clone())
        .update_program(session.user_id, id, request)
        .await?
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    Ok(Json(ApiResponse::ok(program)))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, program_id = %id))]
async fn activate_program(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<ApiResponse<Program>>, ApiError> {
    let program = ProgramService::new(state.db.clone())
        .activate_program(session.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found(PROGRAM_NOT_FOUND))?;

    Ok(Json(
        ApiResponse::ok(program).with_message("Program activated successfully"),
    ))
}

#[tracing::instrument(skip_all, fields(user_id = %session.user_id, program_id = %id))]
async fn delete_program(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted = ProgramService::new(state.db.clone())
        .delete_program(session.user_id, id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found(PROGRAM_NOT_FOUND));
    }

    Ok(Json(ApiResponse::message("Program deleted successfully")))
}
