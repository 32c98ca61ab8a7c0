use chrono::Duration;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, PasswordPolicy,
};
use crate::auth::{AuthError, JwtService, LoginRequest, RegisterRequest, UserSession};
use crate::models::User;
use crate::services::UserService;

/// Token plus the authenticated user
#[derive(Debug)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str, expires_in: Duration) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret, expires_in),
            db,
        }
    }

    fn users(&self) -> UserService {
        UserService::new(self.db.clone())
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthOutcome, AuthError> {
        let new_user = request.validate()?;
        validate_password_strength(&new_user.password, &PasswordPolicy::default())?;

        if self.users().get_user_by_email(&new_user.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&new_user.password)?;

        let user = self
            .users()
            .create_user(&new_user, &password_hash)
            .await
            .map_err(|err| {
                // Lost a race with a concurrent registration for the same email
                if is_unique_violation(&err) {
                    AuthError::EmailAlreadyExists
                } else {
                    AuthError::Internal(err)
                }
            })?;

        let token = self.jwt_service.create_token(user.id)?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok(AuthOutcome { token, user })
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthOutcome, AuthError> {
        let (email, password) = request.validate()?;

        let user = self
            .users()
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&password, &user.password_hash)? {
            tracing::warn!(user_id = %user.id, "failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.users().record_login(user.id).await?;
        let token = self.jwt_service.create_token(user.id)?;

        Ok(AuthOutcome { token, user })
    }

    /// Validate user session from token. Signature and expiry only; no lookup.
    pub fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        self.jwt_service.extract_user_session(token)
    }

    /// Load the user behind a session
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.users()
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}
