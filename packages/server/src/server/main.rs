// Main entry point for the marketplace API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::domains::auth::JwtService;
use server_core::kernel::{
    CloudinaryMediaStore, MongoAdminDirectory, MongoListingRepo, ServerDeps,
};
use server_core::server::build_app;
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campus Marketplace API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let client = mongodb::Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("Failed to connect to database")?;
    let db = client.database(&config.database_name);
    tracing::info!("Database connected");

    // Assemble dependencies
    let deps = ServerDeps::new(
        Arc::new(MongoListingRepo::new(db.clone())),
        Arc::new(MongoAdminDirectory::new(db)),
        Arc::new(CloudinaryMediaStore::new(
            config.cloudinary_cloud_name,
            config.cloudinary_api_key,
            config.cloudinary_api_secret,
        )),
        Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer)),
    );

    // Build application
    let app = build_app(deps, config.allowed_origins);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
