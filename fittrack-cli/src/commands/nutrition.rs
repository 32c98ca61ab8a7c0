use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use dialoguer::Confirm;

use super::authenticated_client;
use crate::api::ApiError;
use crate::config::Config;
use crate::models::{DateRange, Meal, NutritionLog, NutritionLogInput, NutritionProfileInput};
use crate::ui;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Loss,
    Maintain,
    Gain,
}

impl GoalArg {
    fn as_str(self) -> &'static str {
        match self {
            GoalArg::Loss => "loss",
            GoalArg::Maintain => "maintain",
            GoalArg::Gain => "gain",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MealKind {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealKind {
    fn as_str(self) -> &'static str {
        match self {
            MealKind::Breakfast => "breakfast",
            MealKind::Lunch => "lunch",
            MealKind::Dinner => "dinner",
            MealKind::Snack => "snack",
        }
    }
}

#[derive(Args)]
pub struct ProfileSetArgs {
    /// Height in centimetres
    #[arg(long)]
    height: Option<f64>,

    /// Target weight in kilograms
    #[arg(long)]
    target_weight: Option<f64>,

    #[arg(long, value_enum)]
    goal: Option<GoalArg>,

    /// Activity multiplier between 1.2 and 1.9
    #[arg(long)]
    activity_level: Option<f64>,
}

#[derive(Args)]
pub struct DayLogArgs {
    /// Day to record (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Body weight in kilograms
    #[arg(short, long)]
    weight: Option<f64>,

    /// Total calories for a day without itemised meals
    #[arg(short, long)]
    calories: Option<i32>,

    /// Water intake in litres
    #[arg(long)]
    water: Option<f64>,

    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
pub struct MealAddArgs {
    /// Day of the meal (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    #[arg(short = 't', long = "type", value_enum)]
    meal_type: MealKind,

    #[arg(short, long)]
    name: String,

    #[arg(short, long, default_value_t = 0.0)]
    calories: f64,

    #[arg(long, default_value_t = 0.0)]
    protein: f64,

    #[arg(long, default_value_t = 0.0)]
    carbs: f64,

    #[arg(long, default_value_t = 0.0)]
    fats: f64,

    /// Time of the meal, e.g. 08:30
    #[arg(long)]
    time: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn show_profile(config: Config) -> Result<()> {
    let client = authenticated_client(config)?;

    let Some(profile) = client.nutrition_profile().await? else {
        println!("No nutrition profile yet.");
        println!("Use 'fittrack nutrition profile set --height <cm> --target-weight <kg>' to create one.");
        return Ok(());
    };

    ui::heading("Nutrition Profile");
    ui::field("Height (cm)", profile.height);
    ui::field("Target (kg)", profile.target_weight);
    ui::field("Goal", &profile.goal);
    ui::field("Activity level", profile.activity_level);
    Ok(())
}

pub async fn set_profile(config: Config, args: ProfileSetArgs) -> Result<()> {
    let input = NutritionProfileInput {
        height: args.height,
        target_weight: args.target_weight,
        goal: args.goal.map(|g| g.as_str().to_string()),
        activity_level: args.activity_level,
    };
    if input.height.is_none()
        && input.target_weight.is_none()
        && input.goal.is_none()
        && input.activity_level.is_none()
    {
        bail!("Nothing to update. Pass at least one of --height, --target-weight, --goal, --activity-level");
    }

    let client = authenticated_client(config)?;
    let profile = client.save_nutrition_profile(&input).await?;

    ui::success("Nutrition profile saved");
    ui::field("Height (cm)", profile.height);
    ui::field("Target (kg)", profile.target_weight);
    ui::field("Goal", &profile.goal);
    ui::field("Activity level", profile.activity_level);
    Ok(())
}

/// Record weight, calories, water or notes for a day.
///
/// Saving a day replaces its meals, so the meals already logged are sent
/// back unchanged.
pub async fn log_day(config: Config, args: DayLogArgs) -> Result<()> {
    let client = authenticated_client(config)?;
    let date = args.date.unwrap_or_else(today);

    let existing = match client.get_nutrition_log(date).await {
        Ok(log) => Some(log),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };

    let meals = existing.as_ref().map(|log| log.meals.clone()).unwrap_or_default();
    if args.calories.is_some() && !meals.is_empty() {
        bail!("{date} already has meals; its calories are computed from them");
    }

    let input = NutritionLogInput {
        date,
        total_calories: args
            .calories
            .or_else(|| existing.as_ref().filter(|_| meals.is_empty()).map(|log| log.total_calories)),
        meals: Some(meals),
        water_intake: args
            .water
            .or_else(|| existing.as_ref().map(|log| log.water_intake)),
        weight: args.weight,
        notes: args
            .notes
            .or_else(|| existing.as_ref().and_then(|log| log.notes.clone())),
    };

    let log = client.save_nutrition_log(&input).await?;
    ui::success(format!("Saved {}", log.date));
    print_log(&log);
    Ok(())
}

pub async fn add_meal(config: Config, args: MealAddArgs) -> Result<()> {
    let client = authenticated_client(config)?;
    let date = args.date.unwrap_or_else(today);

    let meal = Meal {
        meal_type: args.meal_type.as_str().to_string(),
        name: args.name,
        calories: args.calories,
        protein: args.protein,
        carbs: args.carbs,
        fats: args.fats,
        time: args.time,
        notes: args.notes,
    };

    let log = client.add_meal(date, &meal).await?;
    ui::success(format!("Added {} to {}", meal.name, log.date));
    print_log(&log);
    Ok(())
}

pub async fn list_logs(config: Config, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let client = authenticated_client(config)?;
    let logs = client
        .list_nutrition_logs(DateRange {
            start_date: from,
            end_date: to,
        })
        .await?;

    ui::heading("Nutrition Logs");

    if logs.is_empty() {
        println!("No nutrition logs yet.");
        return Ok(());
    }

    println!(
        "  {:<10}  {:>6}  {:>7}  {:>7}  {:>7}  {:>6}  {:>7}",
        "date", "kcal", "protein", "carbs", "fats", "water", "weight"
    );
    for log in &logs {
        println!(
            "  {}  {:>6}  {:>7.1}  {:>7.1}  {:>7.1}  {:>6.1}  {:>7}",
            log.date,
            log.total_calories,
            log.total_protein,
            log.total_carbs,
            log.total_fats,
            log.water_intake,
            ui::or_dash(log.weight)
        );
    }
    Ok(())
}

pub async fn show_log(config: Config, date: NaiveDate) -> Result<()> {
    let client = authenticated_client(config)?;
    let log = client.get_nutrition_log(date).await?;

    ui::heading(format!("Nutrition - {}", log.date));
    print_log(&log);
    Ok(())
}

pub async fn weight_history(config: Config) -> Result<()> {
    let client = authenticated_client(config)?;
    let entries = client.weight_logs().await?;

    ui::heading("Weight History");

    if entries.is_empty() {
        println!("No weights recorded. Use 'fittrack nutrition log --weight <kg>'.");
        return Ok(());
    }

    for entry in &entries {
        println!("  {}  {:>6.1} kg  {:>6} kcal", entry.date, entry.weight, entry.calories);
    }

    if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
        println!();
        println!("  Change: {:+.1} kg", last.weight - first.weight);
    }
    Ok(())
}

pub async fn delete_log(config: Config, date: NaiveDate, force: bool) -> Result<()> {
    let client = authenticated_client(config)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete the nutrition log for {date}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let message = client.delete_nutrition_log(date).await?;
    ui::success(message);
    Ok(())
}

pub async fn nutrition_stats(config: Config, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let client = authenticated_client(config)?;
    let stats = client
        .nutrition_stats(DateRange {
            start_date: from,
            end_date: to,
        })
        .await?;

    ui::heading("Nutrition Statistics");
    ui::field("Days logged", stats.total_days);
    ui::field("Avg calories", format!("{:.0}", stats.average_calories));
    ui::field("Avg protein", format!("{:.1} g", stats.average_protein));
    ui::field("Avg carbs", format!("{:.1} g", stats.average_carbs));
    ui::field("Avg fats", format!("{:.1} g", stats.average_fats));
    ui::field("Total water", format!("{:.1} l", stats.total_water));
    Ok(())
}

pub async fn show_targets(config: Config) -> Result<()> {
    let client = authenticated_client(config)?;

    let targets = match client.nutrition_targets().await {
        Ok(targets) => targets,
        Err(ApiError::NotFound(_)) => {
            println!("Set up a nutrition profile first with 'fittrack nutrition profile set'.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    ui::heading("Daily Targets");
    ui::field("Current weight", format!("{:.1} kg", targets.current_weight));
    ui::field("Target weight", format!("{:.1} kg", targets.target_weight));
    ui::field("To go", format!("{:+.1} kg", targets.weight_to_go));
    ui::field("BMI", format!("{:.2} ({})", targets.bmi, targets.bmi_category));
    ui::field("BMR", format!("{} kcal", targets.bmr));
    ui::field("Maintenance", format!("{} kcal", targets.maintenance_calories));
    ui::field("Target", format!("{} kcal ({})", targets.target_calories, targets.goal));
    println!();
    println!("  {}", targets.advice);
    Ok(())
}

fn print_log(log: &NutritionLog) {
    ui::field("Calories", log.total_calories);
    ui::field(
        "Macros",
        format!(
            "P {:.1} g / C {:.1} g / F {:.1} g",
            log.total_protein, log.total_carbs, log.total_fats
        ),
    );
    ui::field("Water", format!("{:.1} l", log.water_intake));
    ui::field("Weight", ui::or_dash(log.weight));

    if !log.meals.is_empty() {
        println!();
        println!("  Meals:");
        for meal in &log.meals {
            println!(
                "    {:<10} {:<24} {:>6.0} kcal {}",
                meal.meal_type,
                meal.name,
                meal.calories,
                meal.time.as_deref().unwrap_or("")
            );
        }
    }

    if let Some(notes) = &log.notes {
        println!();
        println!("  {notes}");
    }
}
