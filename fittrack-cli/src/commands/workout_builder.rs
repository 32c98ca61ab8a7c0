use chrono::{Datelike, NaiveDate, Weekday};
use clap::ValueEnum;
use thiserror::Error;

use crate::models::{Exercise, NewWorkout};

/// Set counts offered for each exercise.
pub const SET_OPTIONS: [i32; 3] = [5, 10, 15];
pub const DEFAULT_SETS: i32 = 10;
/// Minutes recorded for a workout built from the catalogue.
pub const BUILT_WORKOUT_DURATION: i32 = 60;

#[derive(Debug, Error, PartialEq)]
pub enum BuilderError {
    #[error("Select at least one exercise")]
    NoExercises,

    #[error("'{exercise}' is not in the {group} catalogue")]
    UnknownExercise { exercise: String, group: &'static str },

    #[error("'{0}' is not selected")]
    NotSelected(String),

    #[error("Sets must be one of 5, 10 or 15 (got {0})")]
    InvalidSets(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MuscleGroup {
    Chest,
    Back,
    Arms,
    Legs,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 4] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Arms,
        MuscleGroup::Legs,
    ];

    /// Value stored in the workout's `muscleGroup` field.
    pub fn id(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Back => "back",
            MuscleGroup::Arms => "arms",
            MuscleGroup::Legs => "legs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back & Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Legs => "Legs",
        }
    }

    pub fn exercises(self) -> &'static [&'static str] {
        match self {
            MuscleGroup::Chest => &[
                "Barbell bench press",
                "Incline dumbbell press",
                "Dumbbell flyes",
                "Parallel bar dips",
                "Cable crossover",
                "Dumbbell pullover",
                "Hammer strength press",
            ],
            MuscleGroup::Back => &[
                "Pull-ups",
                "Bent-over barbell row",
                "Lat pulldown",
                "One-arm dumbbell row",
                "Standing overhead press",
                "Lateral raises",
                "Barbell shrugs",
                "Upright row",
            ],
            MuscleGroup::Arms => &[
                "Barbell curl",
                "Hammer curls",
                "Preacher curl",
                "Lying triceps extension",
                "Cable pushdown",
                "Close-grip bench press",
                "Concentration curl",
            ],
            MuscleGroup::Legs => &[
                "Barbell squat",
                "Leg press",
                "Romanian deadlift",
                "Dumbbell lunges",
                "Leg extensions",
                "Leg curls",
                "Standing calf raises",
                "Hack squat",
            ],
        }
    }

    /// Case-insensitive catalogue lookup returning the canonical name.
    fn find_exercise(self, name: &str) -> Option<&'static str> {
        let name = name.trim();
        self.exercises()
            .iter()
            .copied()
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
    }
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Strength workout assembled by picking exercises from one muscle group.
#[derive(Debug, Clone)]
pub struct WorkoutBuilder {
    group: MuscleGroup,
    date: NaiveDate,
    selected: Vec<Exercise>,
}

impl WorkoutBuilder {
    pub fn new(group: MuscleGroup, date: NaiveDate) -> Self {
        Self {
            group,
            date,
            selected: Vec::new(),
        }
    }

    pub fn group(&self) -> MuscleGroup {
        self.group
    }

    pub fn selected(&self) -> &[Exercise] {
        &self.selected
    }

    /// Select or deselect an exercise. Newly selected exercises start at
    /// `DEFAULT_SETS`. Returns whether the exercise is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> Result<bool, BuilderError> {
        let exercise = self.catalogue_name(name)?;

        if let Some(pos) = self.selected.iter().position(|e| e.name == exercise) {
            self.selected.remove(pos);
            return Ok(false);
        }

        self.selected.push(Exercise {
            name: exercise.to_string(),
            sets: Some(DEFAULT_SETS),
            ..Default::default()
        });
        Ok(true)
    }

    pub fn set_sets(&mut self, name: &str, sets: i32) -> Result<(), BuilderError> {
        if !SET_OPTIONS.contains(&sets) {
            return Err(BuilderError::InvalidSets(sets));
        }

        let exercise = self.catalogue_name(name)?;
        let entry = self
            .selected
            .iter_mut()
            .find(|e| e.name == exercise)
            .ok_or_else(|| BuilderError::NotSelected(exercise.to_string()))?;
        entry.sets = Some(sets);
        Ok(())
    }

    /// `"<Group> - <Weekday>"`, e.g. `"Legs - Friday"`.
    pub fn workout_name(&self) -> String {
        format!("{} - {}", self.group.label(), weekday_name(self.date))
    }

    pub fn build(self) -> Result<NewWorkout, BuilderError> {
        if self.selected.is_empty() {
            return Err(BuilderError::NoExercises);
        }

        Ok(NewWorkout {
            name: self.workout_name(),
            date: self.date,
            workout_type: "strength".to_string(),
            duration: BUILT_WORKOUT_DURATION,
            muscle_group: Some(self.group.id().to_string()),
            exercises: self.selected,
            completed: true,
        })
    }

    fn catalogue_name(&self, name: &str) -> Result<&'static str, BuilderError> {
        self.group
            .find_exercise(name)
            .ok_or_else(|| BuilderError::UnknownExercise {
                exercise: name.trim().to_string(),
                group: self.group.label(),
            })
    }
}

/// Parse `NAME` or `NAME:SETS` as given to `workout log --exercise`.
pub fn parse_exercise_arg(arg: &str) -> (String, Option<i32>) {
    match arg.rsplit_once(':') {
        Some((name, sets)) => match sets.trim().parse() {
            Ok(sets) => (name.trim().to_string(), Some(sets)),
            Err(_) => (arg.trim().to_string(), None),
        },
        None => (arg.trim().to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn test_toggle_selects_with_default_sets_then_deselects() {
        let mut builder = WorkoutBuilder::new(MuscleGroup::Chest, friday());

        assert!(builder.toggle("barbell bench press").unwrap());
        assert_eq!(builder.selected().len(), 1);
        assert_eq!(builder.selected()[0].name, "Barbell bench press");
        assert_eq!(builder.selected()[0].sets, Some(DEFAULT_SETS));

        assert!(!builder.toggle("Barbell bench press").unwrap());
        assert!(builder.selected().is_empty());
    }

    #[test]
    fn test_unknown_exercise_is_rejected() {
        let mut builder = WorkoutBuilder::new(MuscleGroup::Arms, friday());
        let err = builder.toggle("Leg press").unwrap_err();
        assert_eq!(
            err,
            BuilderError::UnknownExercise {
                exercise: "Leg press".to_string(),
                group: "Arms",
            }
        );
    }

    #[test]
    fn test_sets_limited_to_options() {
        let mut builder = WorkoutBuilder::new(MuscleGroup::Legs, friday());
        builder.toggle("Leg press").unwrap();

        builder.set_sets("Leg press", 15).unwrap();
        assert_eq!(builder.selected()[0].sets, Some(15));

        assert_eq!(builder.set_sets("Leg press", 12), Err(BuilderError::InvalidSets(12)));
        assert_eq!(
            builder.set_sets("Leg curls", 5),
            Err(BuilderError::NotSelected("Leg curls".to_string()))
        );
    }

    #[test]
    fn test_build_requires_an_exercise() {
        let builder = WorkoutBuilder::new(MuscleGroup::Back, friday());
        assert_eq!(builder.build().unwrap_err(), BuilderError::NoExercises);
    }

    #[test]
    fn test_build_produces_strength_workout() {
        let mut builder = WorkoutBuilder::new(MuscleGroup::Legs, friday());
        builder.toggle("Barbell squat").unwrap();
        builder.toggle("Leg curls").unwrap();
        builder.set_sets("Leg curls", 5).unwrap();

        let workout = builder.build().unwrap();
        assert_eq!(workout.name, "Legs - Friday");
        assert_eq!(workout.workout_type, "strength");
        assert_eq!(workout.duration, 60);
        assert_eq!(workout.muscle_group.as_deref(), Some("legs"));
        assert_eq!(workout.date, friday());
        assert!(workout.completed);

        let sets: Vec<_> = workout.exercises.iter().map(|e| (e.name.as_str(), e.sets)).collect();
        assert_eq!(sets, vec![("Barbell squat", Some(10)), ("Leg curls", Some(5))]);
    }

    #[test]
    fn test_built_workout_serializes_for_api() {
        let mut builder = WorkoutBuilder::new(MuscleGroup::Chest, friday());
        builder.toggle("Dumbbell flyes").unwrap();

        let json = serde_json::to_value(builder.build().unwrap()).unwrap();
        assert_eq!(json["type"], "strength");
        assert_eq!(json["muscleGroup"], "chest");
        assert_eq!(json["date"], "2025-03-07");
        assert_eq!(json["exercises"][0], serde_json::json!({"name": "Dumbbell flyes", "sets": 10}));
    }

    #[test]
    fn test_parse_exercise_arg() {
        assert_eq!(parse_exercise_arg("Leg press"), ("Leg press".to_string(), None));
        assert_eq!(parse_exercise_arg("Leg press:15"), ("Leg press".to_string(), Some(15)));
        assert_eq!(parse_exercise_arg(" Pull-ups : 5 "), ("Pull-ups".to_string(), Some(5)));
    }

    #[test]
    fn test_every_group_has_a_catalogue() {
        for group in MuscleGroup::ALL {
            assert!(group.exercises().len() >= 7, "{} catalogue too small", group.label());
        }
        assert_eq!(weekday_name(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()), "Sunday");
    }
}
