//! BMI, basal metabolic rate and daily calorie targets.

use serde::Serialize;
use thiserror::Error;

use crate::models::validation::{MAX_ACTIVITY_LEVEL, MIN_ACTIVITY_LEVEL};
use crate::models::{Gender, NutritionGoal};

/// Age assumed when the user never recorded one.
pub const DEFAULT_AGE_YEARS: i32 = 25;
pub const LOSS_ADJUSTMENT_KCAL: f64 = -500.0;
pub const GAIN_ADJUSTMENT_KCAL: f64 = 300.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("Weight must be greater than 0")]
    InvalidWeight,
    #[error("Height must be greater than 0")]
    InvalidHeight,
    #[error("Age must be greater than 0")]
    InvalidAge,
    #[error("Activity level must be between 1.2 and 1.9")]
    InvalidActivityLevel,
    #[error("No current weight recorded; log your weight first")]
    MissingWeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => {
                "Your weight is below the healthy range. Consider a calorie surplus and strength training."
            }
            BmiCategory::Normal => "Your weight is in the healthy range. Keep up the good work!",
            BmiCategory::Overweight => {
                "Your weight is above the healthy range. A moderate calorie deficit and regular cardio can help."
            }
            BmiCategory::Obese => {
                "Your weight is well above the healthy range. Consider consulting a healthcare professional."
            }
        }
    }
}

/// Inputs to the calculator
#[derive(Debug, Clone, Copy)]
pub struct BodyMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: Option<i32>,
    pub sex: Option<Gender>,
}

fn positive(value: f64, err: CalculatorError) -> Result<f64, CalculatorError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(err)
    }
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<f64, CalculatorError> {
    let weight = positive(weight_kg, CalculatorError::InvalidWeight)?;
    let height_m = positive(height_cm, CalculatorError::InvalidHeight)? / 100.0;
    Ok(weight / (height_m * height_m))
}

/// Mifflin-St Jeor. Unspecified sex uses the male offset.
pub fn bmr(metrics: &BodyMetrics) -> Result<f64, CalculatorError> {
    let weight = positive(metrics.weight_kg, CalculatorError::InvalidWeight)?;
    let height = positive(metrics.height_cm, CalculatorError::InvalidHeight)?;
    let age = metrics.age_years.unwrap_or(DEFAULT_AGE_YEARS);
    if age <= 0 {
        return Err(CalculatorError::InvalidAge);
    }

    let sex_offset = match metrics.sex {
        Some(Gender::Female) => -161.0,
        _ => 5.0,
    };

    Ok(10.0 * weight + 6.25 * height - 5.0 * f64::from(age) + sex_offset)
}

pub fn validate_activity(activity_level: f64) -> Result<f64, CalculatorError> {
    if activity_level.is_finite()
        && (MIN_ACTIVITY_LEVEL..=MAX_ACTIVITY_LEVEL).contains(&activity_level)
    {
        Ok(activity_level)
    } else {
        Err(CalculatorError::InvalidActivityLevel)
    }
}

/// Total daily energy expenditure adjusted for the goal.
pub fn target_calories(
    bmr: f64,
    activity_level: f64,
    goal: NutritionGoal,
) -> Result<f64, CalculatorError> {
    let tdee = bmr * validate_activity(activity_level)?;
    let adjustment = match goal {
        NutritionGoal::Loss => LOSS_ADJUSTMENT_KCAL,
        NutritionGoal::Maintain => 0.0,
        NutritionGoal::Gain => GAIN_ADJUSTMENT_KCAL,
    };
    Ok(tdee + adjustment)
}

/// Everything the targets endpoint reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub current_weight: f64,
    pub target_weight: f64,
    pub weight_to_go: f64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub advice: String,
    pub bmr: i32,
    pub maintenance_calories: i32,
    pub target_calories: i32,
    pub goal: NutritionGoal,
    pub activity_level: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn calculate_targets(
    metrics: &BodyMetrics,
    target_weight: f64,
    activity_level: f64,
    goal: NutritionGoal,
) -> Result<NutritionTargets, CalculatorError> {
    let bmi_value = bmi(metrics.weight_kg, metrics.height_cm)?;
    let bmr_value = bmr(metrics)?;
    let maintenance = target_calories(bmr_value, activity_level, NutritionGoal::Maintain)?;
    let target = target_calories(bmr_value, activity_level, goal)?;
    let category = BmiCategory::from_bmi(bmi_value);

    Ok(NutritionTargets {
        current_weight: metrics.weight_kg,
        target_weight,
        weight_to_go: round_to(target_weight - metrics.weight_kg, 1),
        bmi: round_to(bmi_value, 2),
        bmi_category: category,
        advice: category.advice().to_string(),
        bmr: bmr_value.round() as i32,
        maintenance_calories: maintenance.round() as i32,
        target_calories: target.round() as i32,
        goal,
        activity_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn metrics(weight: f64, height: f64) -> BodyMetrics {
        BodyMetrics {
            weight_kg: weight,
            height_cm: height,
            age_years: None,
            sex: None,
        }
    }

    #[test]
    fn test_bmi_reference_value() {
        let value = bmi(70.0, 175.0).unwrap();
        assert!((value - 22.857).abs() < 0.01);
        assert_eq!(BmiCategory::from_bmi(value), BmiCategory::Normal);
    }

    #[test]
    fn test_bmi_band_edges() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_zero_inputs_are_errors() {
        assert_eq!(bmi(70.0, 0.0), Err(CalculatorError::InvalidHeight));
        assert_eq!(bmi(0.0, 175.0), Err(CalculatorError::InvalidWeight));
        assert_eq!(bmi(f64::NAN, 175.0), Err(CalculatorError::InvalidWeight));
    }

    #[test]
    fn test_bmr_defaults_to_age_25_male_offset() {
        // 700 + 1093.75 - 125 + 5
        assert_eq!(bmr(&metrics(70.0, 175.0)).unwrap(), 1673.75);
    }

    #[test]
    fn test_bmr_uses_recorded_age_and_sex() {
        let female = BodyMetrics {
            weight_kg: 60.0,
            height_cm: 165.0,
            age_years: Some(40),
            sex: Some(Gender::Female),
        };
        // 600 + 1031.25 - 200 - 161
        assert_eq!(bmr(&female).unwrap(), 1270.25);
    }

    #[test]
    fn test_goal_adjustments() {
        let base = 1600.0;
        let maintain = target_calories(base, 1.55, NutritionGoal::Maintain).unwrap();
        let loss = target_calories(base, 1.55, NutritionGoal::Loss).unwrap();
        let gain = target_calories(base, 1.55, NutritionGoal::Gain).unwrap();

        assert_eq!(loss, maintain - 500.0);
        assert_eq!(gain, maintain + 300.0);
    }

    #[test]
    fn test_activity_out_of_range() {
        assert_eq!(
            target_calories(1600.0, 2.2, NutritionGoal::Maintain),
            Err(CalculatorError::InvalidActivityLevel)
        );
    }

    #[test]
    fn test_calculate_targets_rounds_outputs() {
        let targets =
            calculate_targets(&metrics(70.0, 175.0), 65.0, 1.55, NutritionGoal::Loss).unwrap();

        assert_eq!(targets.bmi, 22.86);
        assert_eq!(targets.bmi_category, BmiCategory::Normal);
        assert_eq!(targets.bmr, 1674);
        assert_eq!(targets.maintenance_calories, 2594);
        assert_eq!(targets.target_calories, 2094);
        assert_eq!(targets.weight_to_go, -5.0);
    }

    proptest! {
        #[test]
        fn bmi_grows_with_weight(w in 1.0f64..300.0, h in 50.0f64..250.0, dw in 0.1f64..50.0) {
            prop_assert!(bmi(w + dw, h).unwrap() > bmi(w, h).unwrap());
        }

        #[test]
        fn bmi_shrinks_with_height(w in 1.0f64..300.0, h in 50.0f64..250.0, dh in 0.1f64..50.0) {
            prop_assert!(bmi(w, h + dh).unwrap() < bmi(w, h).unwrap());
        }
    }
}
