// Seed the single admin account for a deployment.
//
// Reads ADMIN_USERNAME and ADMIN_PASSWORD from the environment; exits
// cleanly if the account already exists.

use anyhow::{Context, Result};
use server_core::domains::auth::AdminAccount;
use server_core::kernel::{BaseAdminDirectory, MongoAdminDirectory};
use server_core::Config;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let username = env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?;
    let password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

    let client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to connect to database")?;
    let admins = MongoAdminDirectory::new(client.database(&config.database_name));

    if admins.find_by_username(&username).await?.is_some() {
        tracing::info!("Admin '{}' already exists, nothing to do", username);
        return Ok(());
    }

    let account = AdminAccount::new(&username, &password)?;
    admins.insert(&account).await?;
    tracing::info!("Admin '{}' created", username);

    Ok(())
}
