//! Revenue event resource handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, LoaderTrait, ModelTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::admin::double_option;
use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::{customer, organization, revenue_event};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct RevenueEventRecord {
    #[serde(flatten)]
    pub event: revenue_event::Model,
    pub organization: Option<organization::Model>,
    pub customer: Option<customer::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRevenueEvent {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    pub customer_id: Option<String>,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub event_type: String,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub effective_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRevenueEvent {
    pub organization_id: Option<String>,
    /// Nullable: explicit null detaches the customer.
    #[serde(default, deserialize_with = "double_option")]
    pub customer_id: Option<Option<String>>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub effective_date: Option<DateTime<Utc>>,
}

fn default_currency() -> String {
    "USD".to_string()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/revenue-events", get(list).post(create))
        .route(
            "/revenue-events/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn with_relations(
    event: revenue_event::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<RevenueEventRecord> {
    let organization = event.find_related(organization::Entity).one(db).await?;
    let customer = event.find_related(customer::Entity).one(db).await?;
    Ok(RevenueEventRecord {
        event,
        organization,
        customer,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<RevenueEventRecord>>> {
    let events = revenue_event::Entity::find()
        .order_by_desc(revenue_event::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let organizations = events.load_one(organization::Entity, &state.db).await?;
    let customers = events.load_one(customer::Entity, &state.db).await?;

    let records = events
        .into_iter()
        .zip(organizations)
        .zip(customers)
        .map(|((event, organization), customer)| RevenueEventRecord {
            event,
            organization,
            customer,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateRevenueEvent>,
) -> Result<Json<RevenueEventRecord>> {
    let now = Utc::now();
    let model = revenue_event::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        customer_id: Set(body.customer_id),
        amount: Set(body.amount),
        currency: Set(body.currency),
        event_type: Set(body.event_type),
        description: Set(body.description),
        metadata: Set(body.metadata),
        effective_date: Set(body.effective_date),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let event = model.insert(&state.db).await?;
    tracing::info!(event_id = %event.id, amount = event.amount, "revenue event recorded");
    Ok(Json(with_relations(event, &state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<RevenueEventRecord>> {
    let event = revenue_event::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Revenue event not found"))?;
    Ok(Json(with_relations(event, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateRevenueEvent>,
) -> Result<Json<RevenueEventRecord>> {
    let existing = revenue_event::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Revenue event not found"))?;

    let mut active: revenue_event::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(customer_id) = body.customer_id {
        active.customer_id = Set(customer_id);
    }
    if let Some(amount) = body.amount {
        active.amount = Set(amount);
    }
    if let Some(currency) = body.currency {
        active.currency = Set(currency);
    }
    if let Some(event_type) = body.event_type {
        active.event_type = Set(event_type);
    }
    if let Some(description) = body.description {
        active.description = Set(Some(description));
    }
    if let Some(metadata) = body.metadata {
        active.metadata = Set(Some(metadata));
    }
    if let Some(effective_date) = body.effective_date {
        active.effective_date = Set(effective_date);
    }
    active.updated_at = Set(Utc::now());

    let event = active.update(&state.db).await?;
    Ok(Json(with_relations(event, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = revenue_event::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Revenue event not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
