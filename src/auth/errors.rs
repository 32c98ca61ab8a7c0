use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    EmailAlreadyExists,
    #[error("Please provide a valid email")]
    InvalidEmail,
    #[error("Not authorized, token failed")]
    InvalidToken,
    #[error("Not authorized, token expired")]
    TokenExpired,
    #[error("Not authorized, no token")]
    MissingAuthHeader,
    #[error("Not authorized, malformed authorization header")]
    InvalidAuthHeaderFormat,
    #[error("{0}")]
    PasswordValidation(crate::auth::password::PasswordError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password processing error: {0}")]
    PasswordHashing(crate::auth::password::PasswordError),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::auth::password::PasswordError> for AuthError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        if err.is_policy_violation() {
            AuthError::PasswordValidation(err)
        } else {
            AuthError::PasswordHashing(err)
        }
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingFields(_)
            | AuthError::EmailAlreadyExists
            | AuthError::InvalidEmail
            | AuthError::PasswordValidation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeaderFormat => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_)
            | AuthError::Jwt(_)
            | AuthError::PasswordHashing(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "authentication failure");
            "Server error".to_string()
        } else {
            tracing::debug!(error = %self, "request rejected");
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
