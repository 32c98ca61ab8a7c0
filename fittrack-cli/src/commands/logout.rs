use anyhow::Result;
use clap::Args;

use crate::api::ApiClient;
use crate::config::Config;
use crate::ui;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, config: Config) -> Result<()> {
        if !config.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        let client = ApiClient::new(config)?;
        client.logout().await?;

        ui::success("Logged out successfully!");

        Ok(())
    }
}
