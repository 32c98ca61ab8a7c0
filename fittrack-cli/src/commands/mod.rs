mod dashboard;
mod login;
mod logout;
mod nutrition;
mod program;
mod register;
mod whoami;
mod workout;
pub mod workout_builder;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};
use crate::config::Config;

pub use dashboard::DashboardCommand;
pub use login::LoginCommand;
pub use logout::LogoutCommand;
pub use register::RegisterCommand;
pub use whoami::WhoamiCommand;
pub use workout::WorkoutLogCommand;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Track workouts, training programs and nutrition from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "FITTRACK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a FitTrack account
    Register(RegisterCommand),

    /// Login to FitTrack
    Login(LoginCommand),

    /// Logout from FitTrack
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// Manage workouts
    #[command(subcommand)]
    Workout(WorkoutSubcommands),

    /// Manage training programs
    #[command(subcommand)]
    Program(ProgramSubcommands),

    /// Track meals, weight and calorie targets
    #[command(subcommand)]
    Nutrition(NutritionSubcommands),

    /// Show a training and nutrition summary
    Dashboard(DashboardCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum WorkoutSubcommands {
    /// Log a strength workout from a muscle-group catalogue
    Log(WorkoutLogCommand),

    /// List recent workouts
    List {
        /// Filter by workout type
        #[arg(short, long, value_enum)]
        r#type: Option<workout::WorkoutKind>,

        /// Filter from date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Filter to date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },

    /// Show workout details
    Show {
        /// Workout ID
        id: Uuid,
    },

    /// Delete a workout
    Delete {
        /// Workout ID
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show workout statistics
    Stats {
        /// From date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// To date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum ProgramSubcommands {
    /// List all programs
    List,

    /// Show program details
    Show {
        /// Program ID
        id: Uuid,
    },

    /// Show the active program
    Active,

    /// Create a program from a JSON file
    Create {
        /// JSON file with name, goal, level, duration and schedule
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Make a program the active one
    Activate {
        /// Program ID
        id: Uuid,
    },

    /// Delete a program
    Delete {
        /// Program ID
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum NutritionSubcommands {
    /// Manage the nutrition profile
    #[command(subcommand)]
    Profile(ProfileSubcommands),

    /// Record weight, calories or water for a day
    Log(nutrition::DayLogArgs),

    /// Manage meals
    #[command(subcommand)]
    Meal(MealSubcommands),

    /// List nutrition logs
    Logs {
        /// From date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// To date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show one day's log
    Show {
        /// Day (YYYY-MM-DD)
        date: NaiveDate,
    },

    /// Show weight history
    Weight,

    /// Delete a day's log
    Delete {
        /// Day (YYYY-MM-DD)
        date: NaiveDate,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show nutrition averages
    Stats {
        /// From date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// To date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show BMI, BMR and daily calorie targets
    Targets,
}

#[derive(Subcommand)]
enum ProfileSubcommands {
    /// Show the nutrition profile
    Show,

    /// Create or update the nutrition profile
    Set(nutrition::ProfileSetArgs),
}

#[derive(Subcommand)]
enum MealSubcommands {
    /// Add a meal to a day
    Add(nutrition::MealAddArgs),
}

/// Client for commands that need a logged-in user.
pub(crate) fn authenticated_client(config: Config) -> Result<ApiClient> {
    if !config.is_authenticated() {
        return Err(ApiError::NotLoggedIn.into());
    }
    ApiClient::new(config)
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if let Commands::Completions { shell } = self.command {
            generate_completions(shell);
            return Ok(());
        }

        let config = Config::load(self.config.as_deref())?;
        tracing::debug!("Using API at {}", config.api.base_url);

        match self.command {
            Commands::Register(cmd) => cmd.execute(config).await,
            Commands::Login(cmd) => cmd.execute(config).await,
            Commands::Logout(cmd) => cmd.execute(config).await,
            Commands::Whoami(cmd) => cmd.execute(config).await,
            Commands::Workout(subcmd) => match subcmd {
                WorkoutSubcommands::Log(cmd) => cmd.execute(config).await,
                WorkoutSubcommands::List {
                    r#type,
                    from,
                    to,
                    limit,
                } => workout::list_workouts(config, r#type, from, to, limit).await,
                WorkoutSubcommands::Show { id } => workout::show_workout(config, id).await,
                WorkoutSubcommands::Delete { id, force } => {
                    workout::delete_workout(config, id, force).await
                }
                WorkoutSubcommands::Stats { from, to } => {
                    workout::workout_stats(config, from, to).await
                }
            },
            Commands::Program(subcmd) => match subcmd {
                ProgramSubcommands::List => program::list_programs(config).await,
                ProgramSubcommands::Show { id } => program::show_program(config, id).await,
                ProgramSubcommands::Active => program::show_active_program(config).await,
                ProgramSubcommands::Create { file } => program::create_program(config, &file).await,
                ProgramSubcommands::Activate { id } => program::activate_program(config, id).await,
                ProgramSubcommands::Delete { id, force } => {
                    program::delete_program(config, id, force).await
                }
            },
            Commands::Nutrition(subcmd) => match subcmd {
                NutritionSubcommands::Profile(ProfileSubcommands::Show) => {
                    nutrition::show_profile(config).await
                }
                NutritionSubcommands::Profile(ProfileSubcommands::Set(args)) => {
                    nutrition::set_profile(config, args).await
                }
                NutritionSubcommands::Log(args) => nutrition::log_day(config, args).await,
                NutritionSubcommands::Meal(MealSubcommands::Add(args)) => {
                    nutrition::add_meal(config, args).await
                }
                NutritionSubcommands::Logs { from, to } => {
                    nutrition::list_logs(config, from, to).await
                }
                NutritionSubcommands::Show { date } => nutrition::show_log(config, date).await,
                NutritionSubcommands::Weight => nutrition::weight_history(config).await,
                NutritionSubcommands::Delete { date, force } => {
                    nutrition::delete_log(config, date, force).await
                }
                NutritionSubcommands::Stats { from, to } => {
                    nutrition::nutrition_stats(config, from, to).await
                }
                NutritionSubcommands::Targets => nutrition::show_targets(config).await,
            },
            Commands::Dashboard(cmd) => cmd.execute(config).await,
            Commands::Completions { .. } => Ok(()),
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
