use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::validation::{
    required, required_text, validate_activity_level, validate_non_negative, validate_positive,
};

/// Ceiling on a single day's calories
pub const MAX_DAILY_CALORIES: i32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Meal {
    fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::validation(MISSING_MEAL_FIELDS));
        }
        for (value, field) in [
            (self.calories, "Calories"),
            (self.protein, "Protein"),
            (self.carbs, "Carbs"),
            (self.fats, "Fats"),
        ] {
            validate_non_negative(Some(value), field)?;
        }
        if self.calories > f64::from(MAX_DAILY_CALORIES) {
            return Err(calorie_ceiling_error());
        }
        Ok(())
    }
}

fn calorie_ceiling_error() -> ApiError {
    ApiError::validation(format!(
        "Daily calories cannot exceed {MAX_DAILY_CALORIES}"
    ))
}

/// Field-wise sum over a day's meals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MealTotals {
    /// Whole calories as stored on the log.
    pub fn stored_calories(&self) -> Result<i32, ApiError> {
        let rounded = self.calories.round();
        if !(0.0..=f64::from(MAX_DAILY_CALORIES)).contains(&rounded) {
            return Err(calorie_ceiling_error());
        }
        Ok(rounded as i32)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub meals: Json<Vec<Meal>>,
    pub total_calories: i32,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    pub water_intake: f64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/nutrition`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertNutritionLogRequest {
    pub date: Option<NaiveDate>,
    pub meals: Option<Vec<Meal>>,
    pub water_intake: Option<f64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
    pub total_calories: Option<i32>,
    pub total_protein: Option<f64>,
    pub total_carbs: Option<f64>,
    pub total_fats: Option<f64>,
}

/// Validated day log. Totals are already resolved.
#[derive(Debug, Clone)]
pub struct NutritionDay {
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
    pub totals: MealTotals,
    pub total_calories: i32,
    pub water_intake: f64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

impl UpsertNutritionLogRequest {
    pub fn validate(self) -> Result<NutritionDay, ApiError> {
        let date = required(self.date, "Please provide a date")?;
        let meals = self.meals.unwrap_or_default();
        for meal in &meals {
            meal.validate()?;
        }
        validate_non_negative(self.water_intake, "Water intake")?;
        validate_positive(self.weight, "Weight")?;
        validate_non_negative(self.total_calories.map(f64::from), "Total calories")?;
        validate_non_negative(self.total_protein, "Total protein")?;
        validate_non_negative(self.total_carbs, "Total carbs")?;
        validate_non_negative(self.total_fats, "Total fats")?;

        // Meals win; explicit totals only stand in for an empty meal list
        let totals = if meals.is_empty() {
            MealTotals {
                calories: self.total_calories.map(f64::from).unwrap_or_default(),
                protein: self.total_protein.unwrap_or_default(),
                carbs: self.total_carbs.unwrap_or_default(),
                fats: self.total_fats.unwrap_or_default(),
            }
        } else {
            crate::stats::meal_totals(&meals)
        };

        Ok(NutritionDay {
            date,
            meals,
            total_calories: totals.stored_calories()?,
            totals,
            water_intake: self.water_intake.unwrap_or_default(),
            weight: self.weight,
            notes: self.notes,
        })
    }
}

const MISSING_MEAL_FIELDS: &str = "Please provide meal name and type";

/// Body of `PUT /api/nutrition/:date/meals`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealRequest {
    #[serde(rename = "type")]
    pub meal_type: Option<MealType>,
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

impl AddMealRequest {
    pub fn validate(self) -> Result<Meal, ApiError> {
        let meal = Meal {
            name: required_text(self.name, MISSING_MEAL_FIELDS)?,
            meal_type: required(self.meal_type, MISSING_MEAL_FIELDS)?,
            calories: self.calories.unwrap_or_default(),
            protein: self.protein.unwrap_or_default(),
            carbs: self.carbs.unwrap_or_default(),
            fats: self.fats.unwrap_or_default(),
            time: self.time,
            notes: self.notes,
        };
        meal.validate()?;
        Ok(meal)
    }
}

/// Compact weight-history row
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight: f64,
    pub calories: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "nutrition_goal", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NutritionGoal {
    Loss,
    #[default]
    Maintain,
    Gain,
}

pub const DEFAULT_ACTIVITY_LEVEL: f64 = 1.55;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NutritionProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub height: f64,
    pub target_weight: f64,
    pub goal: NutritionGoal,
    pub activity_level: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/nutrition/profile`. Height and target weight are
/// required the first time; later calls may send any subset.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertNutritionProfileRequest {
    pub height: Option<f64>,
    pub target_weight: Option<f64>,
    pub goal: Option<NutritionGoal>,
    pub activity_level: Option<f64>,
}

pub const MISSING_PROFILE_FIELDS: &str = "Please provide height and target weight";

impl UpsertNutritionProfileRequest {
    pub fn validate(self) -> Result<Self, ApiError> {
        validate_positive(self.height, "Height")?;
        validate_positive(self.target_weight, "Target weight")?;
        if let Some(level) = self.activity_level {
            validate_activity_level(level)?;
        }
        Ok(self)
    }
}
