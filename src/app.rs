use axum::Router;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::admin;
use crate::auth::{PasswordHasher, SessionProvider};
use crate::error::{AppError, Result};

/// Shared application state injected into every handler.
///
/// The database handle is opened once at process start and cloned here; it
/// is never explicitly torn down on the request path and closes with the
/// process.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: Arc<dyn SessionProvider>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        sessions: Arc<dyn SessionProvider>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            db,
            sessions,
            hasher,
        }
    }
}

/// Build the application router with all admin resources mounted.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/admin", admin::routes())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(%addr, "ledgerline admin server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))
}
