use anyhow::Result;
use clap::Args;

use crate::api::ApiClient;
use crate::config::Config;
use crate::ui;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        if !config.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'fittrack login' to authenticate.");
            return Ok(());
        }

        let client = ApiClient::new(config)?;

        match client.me().await {
            Ok(user) => {
                ui::success("Authenticated as:");
                println!();
                ui::field("Name", &user.name);
                ui::field("Email", &user.email);
                ui::field("User ID", user.id);
                ui::field("Age", ui::or_dash(user.age));
                ui::field("Gender", ui::or_dash(user.gender));
                ui::field("Weight (kg)", ui::or_dash(user.weight));
                ui::field("Height (cm)", ui::or_dash(user.height));
                ui::field("Goal", ui::or_dash(user.goal));
                Ok(())
            }
            Err(e) => {
                ui::failure(format!("Failed to fetch user information: {e}"));
                Err(e.into())
            }
        }
    }
}
