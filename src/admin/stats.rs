//! Dashboard counts.
//!
//! The four count queries have no ordering dependency on each other and run
//! concurrently.

use axum::{extract::State, Json};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::{customer, invoice, organization, user};
use crate::error::Result;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub users: u64,
    pub organizations: u64,
    pub customers: u64,
    pub invoices: u64,
}

pub async fn overview(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<StatsOverview>> {
    let (users, organizations, customers, invoices) = tokio::try_join!(
        user::Entity::find().count(&state.db),
        organization::Entity::find().count(&state.db),
        customer::Entity::find().count(&state.db),
        invoice::Entity::find().count(&state.db),
    )?;

    Ok(Json(StatsOverview {
        users,
        organizations,
        customers,
        invoices,
    }))
}
