use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::validation::{required, required_text, validate_rating};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workout_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    #[default]
    Strength,
    Cardio,
    Flexibility,
    Sports,
    Other,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Strength => "strength",
            WorkoutType::Cardio => "cardio",
            WorkoutType::Flexibility => "flexibility",
            WorkoutType::Sports => "sports",
            WorkoutType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub duration: Option<i32>,
    pub distance: Option<f64>,
    pub rest: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub name: String,
    pub duration: i32,
    pub muscle_group: Option<String>,
    pub exercises: Json<Vec<Exercise>>,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub workout_type: Option<WorkoutType>,
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub muscle_group: Option<String>,
    pub exercises: Option<Vec<Exercise>>,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub completed: Option<bool>,
}

/// Validated workout ready for insertion
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub date: NaiveDate,
    pub workout_type: WorkoutType,
    pub name: String,
    pub duration: i32,
    pub muscle_group: Option<String>,
    pub exercises: Vec<Exercise>,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub completed: bool,
}

const MISSING_WORKOUT_FIELDS: &str = "Please provide name, duration and type";

impl CreateWorkoutRequest {
    pub fn validate(self) -> Result<NewWorkout, ApiError> {
        let name = required_text(self.name, MISSING_WORKOUT_FIELDS)?;
        let duration = required(self.duration, MISSING_WORKOUT_FIELDS)?;
        let workout_type = required(self.workout_type, MISSING_WORKOUT_FIELDS)?;

        validate_duration(Some(duration))?;
        validate_rating(self.rating)?;
        validate_calories(self.calories_burned)?;
        let exercises = self.exercises.unwrap_or_default();
        validate_exercises(&exercises)?;

        Ok(NewWorkout {
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            workout_type,
            name,
            duration,
            muscle_group: self.muscle_group.filter(|g| !g.trim().is_empty()),
            exercises,
            calories_burned: self.calories_burned,
            notes: self.notes,
            rating: self.rating,
            completed: self.completed.unwrap_or(true),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub workout_type: Option<WorkoutType>,
    pub name: Option<String>,
    pub duration: Option<i32>,
    pub muscle_group: Option<String>,
    pub exercises: Option<Vec<Exercise>>,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub completed: Option<bool>,
}

impl UpdateWorkoutRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        if self.name.is_some() {
            self.name = Some(required_text(self.name, "Workout name cannot be empty")?);
        }
        validate_duration(self.duration)?;
        validate_rating(self.rating)?;
        validate_calories(self.calories_burned)?;
        if let Some(exercises) = &self.exercises {
            validate_exercises(exercises)?;
        }
        Ok(self)
    }
}

fn validate_duration(duration: Option<i32>) -> Result<(), ApiError> {
    match duration {
        Some(d) if d <= 0 => Err(ApiError::validation("Duration must be greater than 0")),
        _ => Ok(()),
    }
}

fn validate_calories(calories: Option<i32>) -> Result<(), ApiError> {
    match calories {
        Some(c) if c < 0 => Err(ApiError::validation("Calories burned cannot be negative")),
        _ => Ok(()),
    }
}

fn validate_exercises(exercises: &[Exercise]) -> Result<(), ApiError> {
    if exercises.iter().any(|e| e.name.trim().is_empty()) {
        return Err(ApiError::validation("Every exercise needs a name"));
    }
    Ok(())
}

/// `?startDate=&endDate=&type=&limit=` on the workout list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub workout_type: Option<WorkoutType>,
    pub limit: Option<i64>,
}

/// `?startDate=&endDate=`, each bound optional and inclusive
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_requires_name_duration_and_type() {
        let request: CreateWorkoutRequest =
            serde_json::from_str(r#"{"name":"Leg day","duration":45}"#).unwrap();
        let err = request.validate().unwrap_err();
        assert_eq!(err.to_string(), MISSING_WORKOUT_FIELDS);
    }

    #[test]
    fn test_create_applies_defaults() {
        let request: CreateWorkoutRequest = serde_json::from_str(
            r#"{"name":"Chest - Monday","duration":60,"type":"strength","muscleGroup":"chest",
                "exercises":[{"name":"Bench Press","sets":10}]}"#,
        )
        .unwrap();

        let workout = request.validate().unwrap();
        assert_eq!(workout.date, Utc::now().date_naive());
        assert!(workout.completed);
        assert_eq!(workout.muscle_group.as_deref(), Some("chest"));
        assert_eq!(workout.exercises[0].sets, Some(10));
    }

    #[test]
    fn test_create_rejects_out_of_range_rating() {
        let request = CreateWorkoutRequest {
            name: Some("Run".into()),
            duration: Some(30),
            workout_type: Some(WorkoutType::Cardio),
            rating: Some(7),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_rejects_non_positive_duration() {
        let request = UpdateWorkoutRequest {
            duration: Some(0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_query_parses_type_filter() {
        let query: WorkoutQuery = serde_json::from_value(serde_json::json!({
            "startDate": "2024-03-01",
            "type": "cardio",
            "limit": 5
        }))
        .unwrap();

        assert_eq!(query.workout_type, Some(WorkoutType::Cardio));
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(query.end_date, None);
    }
}
