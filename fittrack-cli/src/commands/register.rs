use anyhow::{bail, Result};
use clap::Args;
use dialoguer::{Input, Password};

use crate::api::ApiClient;
use crate::config::Config;
use crate::ui;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Args)]
pub struct RegisterCommand {
    /// Display name
    #[arg(short, long)]
    name: Option<String>,

    /// Email address
    #[arg(short, long)]
    email: Option<String>,

    /// Password (prompted with confirmation when omitted)
    #[arg(long, env = "FITTRACK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl RegisterCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        ui::heading("FitTrack - Create account");

        let name = match self.name {
            Some(name) => name,
            None => Input::new().with_prompt("Name").interact_text()?,
        };
        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = match self.password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        };

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            bail!("Password must be at least {MIN_PASSWORD_LENGTH} characters");
        }

        let client = ApiClient::new(config)?;

        match client.register(&name, &email, &password).await {
            Ok(user) => {
                ui::success("Account created!");
                println!();
                println!("Welcome, {}!", user.name);
                println!("You are now logged in as {}.", user.email);
                Ok(())
            }
            Err(e) => {
                ui::failure(format!("Registration failed: {e}"));
                Err(e.into())
            }
        }
    }
}
