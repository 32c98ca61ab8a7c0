use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};

use crate::api::ApiClient;
use crate::config::Config;
use crate::ui;

#[derive(Args)]
pub struct LoginCommand {
    /// Email address
    #[arg(short, long)]
    email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "FITTRACK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        ui::heading("FitTrack - Login");

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = match self.password {
            Some(password) => password,
            None => Password::new().with_prompt("Password").interact()?,
        };

        println!("Logging in as {}...", email);

        let client = ApiClient::new(config)?;

        match client.login(&email, &password).await {
            Ok(user) => {
                ui::success("Login successful!");
                println!();
                println!("Welcome back, {}!", user.name);
                Ok(())
            }
            Err(e) => {
                ui::failure(format!("Login failed: {e}"));
                Err(e.into())
            }
        }
    }
}
