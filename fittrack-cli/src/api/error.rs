use reqwest::StatusCode;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in. Use 'fittrack login' to authenticate.")]
    NotLoggedIn,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("{0}. Your session was cleared; use 'fittrack login' to sign in again.")]
    SessionExpired(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Too many requests: {0}")]
    RateLimited(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Failed to update local config: {0}")]
    LocalConfig(String),
}

impl ApiError {
    /// Map a failed status and the server's `message` to an error.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let msg = match message {
            Some(message) if !message.is_empty() => message,
            _ => status.canonical_reason().unwrap_or("Unknown error").to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::InvalidResponse(msg),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Transport failures are worth another attempt; anything the server answered is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_server_message() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            Some("Please provide name, duration and type".to_string()),
        );
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(err.to_string(), "Please provide name, duration and type");
    }

    #[test]
    fn test_from_status_falls_back_to_reason() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(err.to_string(), "Server error: Internal Server Error");

        let err = ApiError::from_status(StatusCode::NOT_FOUND, Some(String::new()));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn test_from_status_classifies() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, None),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, None),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT, None),
            ApiError::BadRequest(_)
        ));
    }
}
