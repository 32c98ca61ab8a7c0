use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "type")]
    pub meal_type: String,
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

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLog {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(default)]
    pub meals: Vec<Meal>,
    pub total_calories: i32,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fats: f64,
    #[serde(default)]
    pub water_intake: f64,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Body of `POST /api/nutrition`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLogInput {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals: Option<Vec<Meal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogEntry {
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default)]
    pub calories: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NutritionStats {
    pub total_days: usize,
    pub average_calories: f64,
    pub average_protein: f64,
    pub average_carbs: f64,
    pub average_fats: f64,
    pub total_water: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionProfile {
    pub height: f64,
    pub target_weight: f64,
    pub goal: String,
    pub activity_level: f64,
}

/// Body of `POST /api/nutrition/profile`; unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub current_weight: f64,
    pub target_weight: f64,
    pub weight_to_go: f64,
    pub bmi: f64,
    pub bmi_category: String,
    pub advice: String,
    pub bmr: i32,
    pub maintenance_calories: i32,
    pub target_calories: i32,
    pub goal: String,
    pub activity_level: f64,
}
