//! Marketplace Entry Point
//!
//! Opens the store, applies migrations and seeds the administrator.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use marketplace::{MarketplaceConfig, MarketplaceService, SqliteStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for embedding front ends
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://marketplace.db?mode=rwc";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bootstrap=info,marketplace=info,platform=info,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    // Database connection
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let options = SqliteConnectOptions::from_str(&database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!(database_url = %database_url, "Connected to database");

    let store = SqliteStore::new(pool);
    store.migrate().await?;

    let (users, courses) = store.counts().await?;
    tracing::info!(users, courses, "Store ready");

    let service = MarketplaceService::new(store, config);
    seed_admin(&service).await?;

    Ok(())
}

/// Build the application config from the environment
fn load_config() -> anyhow::Result<MarketplaceConfig> {
    let mut config = if cfg!(debug_assertions) {
        MarketplaceConfig::development()
    } else {
        MarketplaceConfig::default()
    };

    if let Ok(cost) = env::var("MARKETPLACE_PASSWORD_COST") {
        config.password_cost = cost
            .trim()
            .parse()
            .with_context(|| format!("MARKETPLACE_PASSWORD_COST is not a number: {cost}"))?;
    }

    // Rejects a cost outside the bcrypt range before anything is hashed
    config.hasher()?;

    config.admin_email = env::var("MARKETPLACE_ADMIN_EMAIL").ok();

    Ok(config)
}

/// Create the administrator account when all three variables are set
async fn seed_admin(service: &MarketplaceService<SqliteStore>) -> anyhow::Result<()> {
    let user_name = env::var("MARKETPLACE_ADMIN_USERNAME").ok();
    let password = env::var("MARKETPLACE_ADMIN_PASSWORD").ok();

    let (Some(user_name), Some(email), Some(password)) =
        (user_name, service.config().admin_email.clone(), password)
    else {
        tracing::debug!("Administrator seeding skipped");
        return Ok(());
    };

    match service.seed_admin(user_name, email, password).await? {
        Some(admin) => tracing::info!(user_id = %admin.user_id, "Administrator created"),
        None => tracing::info!("Administrator already exists"),
    }

    Ok(())
}
