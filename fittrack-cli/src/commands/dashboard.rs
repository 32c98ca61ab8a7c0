use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::Args;

use super::authenticated_client;
use crate::config::Config;
use crate::models::DateRange;
use crate::ui;

/// Days covered by the nutrition averages.
const NUTRITION_WINDOW_DAYS: i64 = 7;

#[derive(Args)]
pub struct DashboardCommand {}

fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

impl DashboardCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let greeting = config
            .user
            .as_ref()
            .map(|user| format!("Welcome back, {}!", user.name))
            .unwrap_or_else(|| "Welcome back!".to_string());
        let client = authenticated_client(config)?;

        let today = Local::now().date_naive();
        let this_month = DateRange {
            start_date: Some(month_start(today)),
            end_date: Some(today),
        };
        let recent = DateRange {
            start_date: Some(today - Duration::days(NUTRITION_WINDOW_DAYS - 1)),
            end_date: Some(today),
        };

        let (all_time, month, program, nutrition) = tokio::try_join!(
            client.workout_stats(DateRange::default()),
            client.workout_stats(this_month),
            client.active_program(),
            client.nutrition_stats(recent),
        )?;

        ui::heading(greeting);
        ui::field("Total workouts", all_time.total_workouts);
        ui::field("This month", month.total_workouts);

        match &program {
            Some(program) => ui::field(
                "Program",
                format!(
                    "{} {}",
                    program.name,
                    ui::progress_bar(program.progress.percent_complete(), 20)
                ),
            ),
            None => ui::field("Program", "none active"),
        }

        println!();
        println!("  Nutrition, last {NUTRITION_WINDOW_DAYS} days ({} logged):", nutrition.total_days);
        ui::field("Avg calories", format!("{:.0}", nutrition.average_calories));
        ui::field("Avg protein", format!("{:.1} g", nutrition.average_protein));
        ui::field("Avg carbs", format!("{:.1} g", nutrition.average_carbs));
        ui::field("Avg fats", format!("{:.1} g", nutrition.average_fats));

        Ok(())
    }
}
