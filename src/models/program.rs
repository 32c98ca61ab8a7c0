use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::validation::{required, required_text};
use crate::models::{Exercise, FitnessGoal, WorkoutType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "program_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProgramLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

pub const DEFAULT_PROGRAM_WEEKS: i32 = 4;
pub const MAX_PROGRAM_WEEKS: i32 = 52;

/// One session template inside a program's weekly schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub name: String,
    #[serde(rename = "type", default)]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub duration: Option<i32>,
}

/// Weekday to session templates. Days without sessions are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramSchedule {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monday: Vec<WorkoutTemplate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tuesday: Vec<WorkoutTemplate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wednesday: Vec<WorkoutTemplate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thursday: Vec<WorkoutTemplate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friday: Vec<WorkoutTemplate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub saturday: Vec<WorkoutTemplate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sunday: Vec<WorkoutTemplate>,
}

impl ProgramSchedule {
    fn days(&self) -> [&Vec<WorkoutTemplate>; 7] {
        [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
            &self.sunday,
        ]
    }

    /// Number of session templates across the week
    pub fn sessions_per_week(&self) -> usize {
        self.days().iter().map(|day| day.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramProgress {
    pub completed_workouts: i32,
    pub total_workouts: i32,
    pub current_week: i32,
}

impl ProgramProgress {
    /// Fresh progress for `weeks` repetitions of `schedule`.
    pub fn initial(schedule: &ProgramSchedule, weeks: i32) -> Result<Self, ApiError> {
        let total_workouts = i32::try_from(schedule.sessions_per_week())
            .ok()
            .and_then(|per_week| per_week.checked_mul(weeks))
            .ok_or_else(|| ApiError::validation("Program schedule has too many sessions"))?;

        Ok(Self {
            completed_workouts: 0,
            total_workouts,
            current_week: 1,
        })
    }

    /// Completion as a whole percentage, 0 when the program has no sessions.
    pub fn percent_complete(&self) -> i32 {
        if self.total_workouts <= 0 {
            return 0;
        }
        let pct = f64::from(self.completed_workouts) / f64::from(self.total_workouts) * 100.0;
        pct.round().clamp(0.0, 100.0) as i32
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub goal: FitnessGoal,
    pub level: ProgramLevel,
    pub duration: i32,
    pub schedule: Json<ProgramSchedule>,
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub progress: Json<ProgramProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<FitnessGoal>,
    pub level: Option<ProgramLevel>,
    pub duration: Option<i32>,
    pub schedule: Option<ProgramSchedule>,
}

/// Validated program ready for insertion; always starts inactive
#[derive(Debug, Clone)]
pub struct NewProgram {
    pub name: String,
    pub description: Option<String>,
    pub goal: FitnessGoal,
    pub level: ProgramLevel,
    pub duration: i32,
    pub schedule: ProgramSchedule,
    pub progress: ProgramProgress,
}

const MISSING_PROGRAM_FIELDS: &str = "Please provide name, goal and schedule";

impl CreateProgramRequest {
    pub fn validate(self) -> Result<NewProgram, ApiError> {
        let name = required_text(self.name, MISSING_PROGRAM_FIELDS)?;
        let goal = required(self.goal, MISSING_PROGRAM_FIELDS)?;
        let schedule = required(self.schedule, MISSING_PROGRAM_FIELDS)?;
        let duration = self.duration.unwrap_or(DEFAULT_PROGRAM_WEEKS);
        validate_weeks(duration)?;

        Ok(NewProgram {
            progress: ProgramProgress::initial(&schedule, duration)?,
            name,
            description: self.description,
            goal,
            level: self.level.unwrap_or_default(),
            duration,
            schedule,
        })
    }
}

/// Partial program update. Activation has its own endpoint, so `isActive`
/// is not accepted here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgramRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub goal: Option<FitnessGoal>,
    pub level: Option<ProgramLevel>,
    pub duration: Option<i32>,
    pub schedule: Option<ProgramSchedule>,
    pub progress: Option<ProgramProgress>,
}

impl UpdateProgramRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        if self.name.is_some() {
            self.name = Some(required_text(self.name, "Program name cannot be empty")?);
        }
        if let Some(weeks) = self.duration {
            validate_weeks(weeks)?;
        }
        if let Some(progress) = &self.progress {
            if progress.completed_workouts < 0 || progress.total_workouts < 0 || progress.current_week < 1 {
                return Err(ApiError::validation("Invalid program progress"));
            }
        }
        Ok(self)
    }
}

fn validate_weeks(weeks: i32) -> Result<(), ApiError> {
    if !(1..=MAX_PROGRAM_WEEKS).contains(&weeks) {
        return Err(ApiError::validation(format!(
            "Program duration must be between 1 and {MAX_PROGRAM_WEEKS} weeks"
        )));
    }
    Ok(())
}
