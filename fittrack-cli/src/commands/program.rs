use anyhow::{bail, Context, Result};
use dialoguer::Confirm;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::authenticated_client;
use crate::config::Config;
use crate::models::Program;
use crate::ui;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub async fn list_programs(config: Config) -> Result<()> {
    let client = authenticated_client(config)?;
    let programs = client.list_programs().await?;

    ui::heading("Training Programs");

    if programs.is_empty() {
        println!("No programs yet. Use 'fittrack program create --file <json>' to add one.");
        return Ok(());
    }

    for program in &programs {
        let marker = if program.is_active { "*" } else { " " };
        println!(
            "{} {:<28} {:<14} {:>2} wk  {}",
            marker, program.name, program.level, program.duration, program.id
        );
    }
    println!();
    println!("* active program");

    Ok(())
}

pub async fn show_program(config: Config, id: Uuid) -> Result<()> {
    let client = authenticated_client(config)?;
    let program = client.get_program(id).await?;

    print_program(&program);
    Ok(())
}

pub async fn show_active_program(config: Config) -> Result<()> {
    let client = authenticated_client(config)?;

    match client.active_program().await? {
        Some(program) => print_program(&program),
        None => println!("No active program. Use 'fittrack program activate <id>' to start one."),
    }
    Ok(())
}

/// Create a program from a JSON file holding the request body.
pub async fn create_program(config: Config, file: &Path) -> Result<()> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let body: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    if !body.is_object() {
        bail!("{} must contain a JSON object", file.display());
    }

    let client = authenticated_client(config)?;
    let program = client.create_program(&body).await?;

    ui::success(format!("Program '{}' created", program.name));
    print_program(&program);
    Ok(())
}

pub async fn activate_program(config: Config, id: Uuid) -> Result<()> {
    let client = authenticated_client(config)?;
    let program = client.activate_program(id).await?;

    ui::success(format!("'{}' is now your active program", program.name));
    if let (Some(start), Some(end)) = (program.start_date, program.end_date) {
        println!("  Runs {start} to {end}");
    }
    Ok(())
}

pub async fn delete_program(config: Config, id: Uuid, force: bool) -> Result<()> {
    let client = authenticated_client(config)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete program {id}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let message = client.delete_program(id).await?;
    ui::success(message);
    Ok(())
}

fn print_program(program: &Program) {
    println!();
    ui::field("Name", &program.name);
    if let Some(description) = &program.description {
        ui::field("Description", description);
    }
    ui::field("Goal", &program.goal);
    ui::field("Level", &program.level);
    ui::field("Duration", format!("{} weeks", program.duration));
    ui::field("Active", if program.is_active { "yes" } else { "no" });
    if program.is_active {
        ui::field("Week", program.progress.current_week);
        ui::field("Progress", ui::progress_bar(program.progress.percent_complete(), 20));
    }
    ui::field("ID", program.id);

    println!();
    println!("  Schedule:");
    for day in WEEKDAYS {
        let Some(sessions) = program.schedule.get(day).and_then(|v| v.as_array()) else {
            continue;
        };
        if sessions.is_empty() {
            continue;
        }
        let names: Vec<&str> = sessions
            .iter()
            .filter_map(|s| s.get("name").and_then(|n| n.as_str()))
            .collect();
        println!("    {:<10} {}", day, names.join(", "));
    }
}
