use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Meal, MealTotals, NutritionLog, Workout};

/// Arithmetic mean; 0 for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Count items per key; items whose key is `None` are skipped.
pub fn count_by<'a, T, F>(items: &'a [T], key: F) -> BTreeMap<String, usize>
where
    F: Fn(&'a T) -> Option<&'a str>,
{
    let mut counts = BTreeMap::new();
    for tag in items.iter().filter_map(key) {
        *counts.entry(tag.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn meal_totals(meals: &[Meal]) -> MealTotals {
    meals.iter().fold(MealTotals::default(), |acc, meal| MealTotals {
        calories: acc.calories + meal.calories,
        protein: acc.protein + meal.protein,
        carbs: acc.carbs + meal.carbs,
        fats: acc.fats + meal.fats,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub total_workouts: usize,
    pub total_duration: i64,
    pub total_calories: i64,
    pub by_type: BTreeMap<String, usize>,
    pub by_muscle_group: BTreeMap<String, usize>,
    pub average_rating: f64,
}

impl WorkoutStats {
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        Self {
            total_workouts: workouts.len(),
            total_duration: workouts.iter().map(|w| i64::from(w.duration)).sum(),
            total_calories: workouts
                .iter()
                .map(|w| i64::from(w.calories_burned.unwrap_or(0)))
                .sum(),
            by_type: count_by(workouts, |w| Some(w.workout_type.as_str())),
            by_muscle_group: count_by(workouts, |w| w.muscle_group.as_deref()),
            average_rating: mean(workouts.iter().filter_map(|w| w.rating).map(f64::from)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStats {
    pub total_days: usize,
    pub average_calories: f64,
    pub average_protein: f64,
    pub average_carbs: f64,
    pub average_fats: f64,
    pub total_water: f64,
}

impl NutritionStats {
    pub fn from_logs(logs: &[NutritionLog]) -> Self {
        Self {
            total_days: logs.len(),
            average_calories: mean(logs.iter().map(|l| f64::from(l.total_calories))),
            average_protein: mean(logs.iter().map(|l| l.total_protein)),
            average_carbs: mean(logs.iter().map(|l| l.total_carbs)),
            average_fats: mean(logs.iter().map(|l| l.total_fats)),
            total_water: logs.iter().map(|l| l.water_intake).sum(),
        }
    }
}
