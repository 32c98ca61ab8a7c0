use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use dialoguer::{Confirm, MultiSelect, Select};
use uuid::Uuid;

use super::workout_builder::{
    parse_exercise_arg, MuscleGroup, WorkoutBuilder, DEFAULT_SETS, SET_OPTIONS,
};
use super::authenticated_client;
use crate::config::Config;
use crate::models::{DateRange, Workout, WorkoutFilter};
use crate::ui;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WorkoutKind {
    Strength,
    Cardio,
    Flexibility,
    Sports,
    Other,
}

impl WorkoutKind {
    fn as_str(self) -> &'static str {
        match self {
            WorkoutKind::Strength => "strength",
            WorkoutKind::Cardio => "cardio",
            WorkoutKind::Flexibility => "flexibility",
            WorkoutKind::Sports => "sports",
            WorkoutKind::Other => "other",
        }
    }
}

/// Log a strength workout from a muscle-group catalogue.
#[derive(Args)]
pub struct WorkoutLogCommand {
    /// Muscle group (prompted when omitted)
    #[arg(short, long, value_enum)]
    group: Option<MuscleGroup>,

    /// Workout date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Exercise as NAME or NAME:SETS; repeat for several. Prompts when omitted.
    #[arg(short, long = "exercise")]
    exercises: Vec<String>,
}

impl WorkoutLogCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        let client = authenticated_client(config)?;

        let group = match self.group {
            Some(group) => group,
            None => prompt_group()?,
        };
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut builder = WorkoutBuilder::new(group, date);

        if self.exercises.is_empty() {
            prompt_exercises(&mut builder)?;
        } else {
            for arg in &self.exercises {
                let (name, sets) = parse_exercise_arg(arg);
                builder.toggle(&name)?;
                if let Some(sets) = sets {
                    builder.set_sets(&name, sets)?;
                }
            }
        }

        let workout = builder.build()?;
        let created = client.create_workout(&workout).await?;

        ui::success(format!("Workout '{}' logged", created.name));
        print_workout(&created);

        Ok(())
    }
}

fn prompt_group() -> Result<MuscleGroup> {
    let labels: Vec<&str> = MuscleGroup::ALL.iter().map(|g| g.label()).collect();
    let index = Select::new()
        .with_prompt("Muscle group")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MuscleGroup::ALL[index])
}

fn prompt_exercises(builder: &mut WorkoutBuilder) -> Result<()> {
    let catalogue = builder.group().exercises();
    let picked = MultiSelect::new()
        .with_prompt("Exercises (space to toggle, enter to confirm)")
        .items(catalogue)
        .interact()?;

    let default_index = SET_OPTIONS
        .iter()
        .position(|&s| s == DEFAULT_SETS)
        .unwrap_or(0);

    for index in picked {
        let name = catalogue[index];
        builder.toggle(name)?;

        let choice = Select::new()
            .with_prompt(format!("Sets for {name}"))
            .items(&SET_OPTIONS)
            .default(default_index)
            .interact()?;
        builder.set_sets(name, SET_OPTIONS[choice])?;
    }

    Ok(())
}

pub async fn list_workouts(
    config: Config,
    kind: Option<WorkoutKind>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: i64,
) -> Result<()> {
    let client = authenticated_client(config)?;

    let filter = WorkoutFilter {
        start_date: from,
        end_date: to,
        workout_type: kind.map(|k| k.as_str().to_string()),
        limit: Some(limit),
    };
    let workouts = client.list_workouts(&filter).await?;

    ui::heading("Recent Workouts");

    if workouts.is_empty() {
        println!("No workouts yet. Use 'fittrack workout log' to add one.");
        return Ok(());
    }

    for workout in &workouts {
        println!(
            "  {}  {:<28} {:<12} {:>4} min  {}",
            workout.date,
            workout.name,
            workout.workout_type,
            workout.duration,
            workout.id
        );
    }
    println!();
    println!("{} workout(s)", workouts.len());

    Ok(())
}

pub async fn show_workout(config: Config, id: Uuid) -> Result<()> {
    let client = authenticated_client(config)?;
    let workout = client.get_workout(id).await?;

    print_workout(&workout);
    Ok(())
}

pub async fn delete_workout(config: Config, id: Uuid, force: bool) -> Result<()> {
    let client = authenticated_client(config)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete workout {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let message = client.delete_workout(id).await?;
    ui::success(message);
    Ok(())
}

pub async fn workout_stats(config: Config, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let client = authenticated_client(config)?;
    let stats = client
        .workout_stats(DateRange {
            start_date: from,
            end_date: to,
        })
        .await
        .context("Failed to load workout statistics")?;

    ui::heading("Workout Statistics");
    ui::field("Workouts", stats.total_workouts);
    ui::field("Total minutes", stats.total_duration);
    ui::field("Calories burned", stats.total_calories);
    if stats.average_rating > 0.0 {
        ui::field("Average rating", format!("{:.1}", stats.average_rating));
    }

    if !stats.by_type.is_empty() {
        println!();
        println!("  By type:");
        for (kind, count) in &stats.by_type {
            println!("    {kind:<14} {count}");
        }
    }
    if !stats.by_muscle_group.is_empty() {
        println!();
        println!("  By muscle group:");
        for (group, count) in &stats.by_muscle_group {
            println!("    {group:<14} {count}");
        }
    }

    Ok(())
}

fn print_workout(workout: &Workout) {
    println!();
    ui::field("Name", &workout.name);
    ui::field("Date", workout.date);
    ui::field("Type", &workout.workout_type);
    ui::field("Duration", format!("{} min", workout.duration));
    ui::field("Muscle group", ui::or_dash(workout.muscle_group.as_deref()));
    ui::field("Calories", ui::or_dash(workout.calories_burned));
    ui::field("Rating", ui::or_dash(workout.rating));
    ui::field("ID", workout.id);

    if !workout.exercises.is_empty() {
        println!();
        println!("  Exercises:");
        for exercise in &workout.exercises {
            let sets = exercise
                .sets
                .map(|s| format!("{s} sets"))
                .unwrap_or_default();
            println!("    - {:<28} {}", exercise.name, sets);
        }
    }

    if let Some(notes) = &workout.notes {
        println!();
        println!("  {notes}");
    }
}
