use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramProgress {
    pub completed_workouts: i32,
    pub total_workouts: i32,
    pub current_week: i32,
}

impl ProgramProgress {
    /// Completed share of scheduled workouts, 0 when nothing is scheduled.
    pub fn percent_complete(&self) -> f64 {
        if self.total_workouts <= 0 {
            return 0.0;
        }
        (self.completed_workouts as f64 / self.total_workouts as f64 * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub goal: String,
    pub level: String,
    pub duration: i32,
    /// Weekday to workout templates, kept as raw JSON for display.
    #[serde(default)]
    pub schedule: serde_json::Value,
    #[serde(default)]
    pub is_active: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: ProgramProgress,
}
