use std::sync::Arc;

use sea_orm_migration::MigratorTrait;

use ledgerline::auth::{PasswordHasher, Role, Session, StaticSessionProvider};
use ledgerline::{AppState, ConfigBuilder, Migrator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigBuilder::new().from_env().build();
    ledgerline::init_tracing_with_config(&config);

    let db = sea_orm::Database::connect(&config.database.url).await?;
    Migrator::up(&db, None).await?;

    // Session issuance is delegated to the fronting auth provider; the
    // standalone server accepts a single admin token provisioned via env.
    let mut sessions = StaticSessionProvider::new();
    match std::env::var("LEDGERLINE_ADMIN_TOKEN") {
        Ok(token) if !token.is_empty() => {
            sessions = sessions.with_token(token, Session::new("admin", Role::Admin));
        }
        _ => {
            tracing::warn!("LEDGERLINE_ADMIN_TOKEN not set; all admin requests will be rejected");
        }
    }

    let state = AppState::new(db, Arc::new(sessions), PasswordHasher::default());
    ledgerline::app::serve(state, config.server.addr()?).await?;
    Ok(())
}
