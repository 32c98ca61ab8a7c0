use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{FitnessGoal, Gender};

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

/// Registration body. Required fields are optional here so that a missing
/// one is reported as a validation error instead of a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<FitnessGoal>,
}

/// Validated registration data
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<FitnessGoal>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, crate::auth::AuthError> {
        let (email, password, name) = match (self.email, self.password, self.name) {
            (Some(email), Some(password), Some(name))
                if !email.trim().is_empty() && !password.is_empty() && !name.trim().is_empty() =>
            {
                (email, password, name)
            }
            _ => {
                return Err(crate::auth::AuthError::MissingFields(
                    "Please provide all required fields",
                ))
            }
        };

        let email = crate::models::validation::normalize_email(&email)
            .ok_or(crate::auth::AuthError::InvalidEmail)?;

        Ok(NewUser {
            email,
            password,
            name: name.trim().to_string(),
            age: self.age,
            gender: self.gender,
            weight: self.weight,
            height: self.height,
            goal: self.goal,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the normalized email and the password.
    pub fn validate(self) -> Result<(String, String), crate::auth::AuthError> {
        match (self.email, self.password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Ok((email.trim().to_lowercase(), password))
            }
            _ => Err(crate::auth::AuthError::MissingFields(
                "Please provide email and password",
            )),
        }
    }
}

/// User session information
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
    pub jti: String,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            jti: claims.jti.clone(),
        })
    }
}
