use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::validation::{required_text, validate_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fitness_goal", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    #[default]
    Maintenance,
    Endurance,
    GeneralFitness,
    Flexibility,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub notifications: bool,
    pub theme: Theme,
    pub units: Units,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications: true,
            theme: Theme::Light,
            units: Units::Metric,
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: FitnessGoal,
    pub settings: Json<UserSettings>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub goal: Option<FitnessGoal>,
    pub settings: Option<UserSettings>,
}

impl UpdateProfileRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        if self.name.is_some() {
            self.name = Some(required_text(self.name, "Name cannot be empty")?);
        }
        if let Some(age) = self.age {
            if !(1..=150).contains(&age) {
                return Err(ApiError::validation("Age must be between 1 and 150"));
            }
        }
        validate_positive(self.weight, "Weight")?;
        validate_positive(self.height, "Height")?;
        Ok(self)
    }
}
