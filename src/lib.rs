//! Ledgerline - admin core for a multi-tenant SaaS billing product
//!
//! Ledgerline is built on top of Axum, Tokio, and SeaORM. It exposes every
//! billing entity (organizations, customers, plans, subscriptions, revenue
//! events, invoices, integrations, API keys, team members, usage metrics,
//! users) as an admin-only REST resource, and ships the entity console
//! client that drives those resources.
//!
//! # Features
//!
//! - **HTTP**: Axum-based routing under `/api/admin`
//! - **Authorization**: a single admin-session gate in front of every handler
//! - **Database**: SeaORM entities with migrations
//! - **Validation**: schema-per-payload validation reporting every failing field
//! - **Console**: a declarative list/create/edit/delete client for any entity
//! - **Testing**: oneshot HTTP scenarios and an in-memory test database
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ledgerline::{AppState, ConfigBuilder, Migrator};
//! use ledgerline::auth::{PasswordHasher, Role, Session, StaticSessionProvider};
//! use sea_orm_migration::MigratorTrait;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ledgerline::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build();
//!     let db = sea_orm::Database::connect(&config.database.url).await?;
//!     Migrator::up(&db, None).await?;
//!
//!     let sessions = StaticSessionProvider::new()
//!         .with_token("admin-token", Session::new("usr_1", Role::Admin));
//!
//!     let state = AppState::new(db, Arc::new(sessions), PasswordHasher::default());
//!     ledgerline::app::serve(state, config.server.addr()?).await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod app;
pub mod auth;
mod config;
pub mod console;
pub mod entities;
mod error;
pub mod migration;
pub mod testing;
pub mod validation;

// Re-exports for public API
pub use app::AppState;
pub use config::{Config, ConfigBuilder, DatabaseConfig, LoggingConfig, ServerConfig};
pub use error::{AppError, ErrorResponse, Result};
pub use migration::Migrator;
pub use validation::ValidatedJson;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging with sensible defaults
///
/// This should be called early in your application, typically in main()
/// before connecting the database.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "ledgerline=debug")
/// - `LEDGERLINE_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("LEDGERLINE_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
