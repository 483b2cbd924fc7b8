//! Customer resource handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, LoaderTrait, ModelTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::{customer, organization};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct CustomerRecord {
    #[serde(flatten)]
    pub customer: customer::Model,
    pub organization: Option<organization::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    #[serde(default)]
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    pub organization_id: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list).post(create))
        .route("/customers/{id}", get(get_one).put(update).delete(remove))
}

async fn with_organization(
    customer: customer::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<CustomerRecord> {
    let organization = customer.find_related(organization::Entity).one(db).await?;
    Ok(CustomerRecord {
        customer,
        organization,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<CustomerRecord>>> {
    let customers = customer::Entity::find()
        .order_by_desc(customer::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let organizations = customers.load_one(organization::Entity, &state.db).await?;

    let records = customers
        .into_iter()
        .zip(organizations)
        .map(|(customer, organization)| CustomerRecord {
            customer,
            organization,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateCustomer>,
) -> Result<Json<CustomerRecord>> {
    let now = Utc::now();
    let model = customer::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        email: Set(body.email),
        name: Set(body.name),
        external_id: Set(body.external_id),
        metadata: Set(body.metadata),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let customer = model.insert(&state.db).await?;
    tracing::info!(customer_id = %customer.id, "customer created");
    Ok(Json(with_organization(customer, &state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<CustomerRecord>> {
    let customer = customer::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;
    Ok(Json(with_organization(customer, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateCustomer>,
) -> Result<Json<CustomerRecord>> {
    let existing = customer::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;

    let mut active: customer::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(email) = body.email {
        active.email = Set(email);
    }
    if let Some(name) = body.name {
        active.name = Set(Some(name));
    }
    if let Some(external_id) = body.external_id {
        active.external_id = Set(Some(external_id));
    }
    if let Some(metadata) = body.metadata {
        active.metadata = Set(Some(metadata));
    }
    active.updated_at = Set(Utc::now());

    let customer = active.update(&state.db).await?;
    Ok(Json(with_organization(customer, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = customer::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Customer not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
