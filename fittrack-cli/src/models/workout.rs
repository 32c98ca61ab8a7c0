use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub name: String,
    pub duration: i32,
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub calories_burned: Option<i32>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /api/workouts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub name: String,
    pub duration: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    pub exercises: Vec<Exercise>,
    pub completed: bool,
}

/// Query string for `GET /api/workouts`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

/// Optional date bounds shared by the stats and list endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub total_duration: i64,
    pub total_calories: i64,
    pub by_type: BTreeMap<String, usize>,
    pub by_muscle_group: BTreeMap<String, usize>,
    pub average_rating: f64,
}
