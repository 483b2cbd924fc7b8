//! Invoice resource handlers.

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
use crate::entities::{customer, invoice, organization};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct InvoiceRecord {
    #[serde(flatten)]
    pub invoice: invoice::Model,
    pub organization: Option<organization::Model>,
    pub customer: Option<customer::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoice {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    pub customer_id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub number: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub due_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub external_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoice {
    pub organization_id: Option<String>,
    /// Nullable: explicit null detaches the customer.
    #[serde(default, deserialize_with = "double_option")]
    pub customer_id: Option<Option<String>>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub number: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    /// Nullable: explicit null clears the due date.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Nullable: explicit null marks the invoice unpaid again.
    #[serde(default, deserialize_with = "double_option")]
    pub paid_at: Option<Option<DateTime<Utc>>>,
    pub external_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_status() -> String {
    "draft".to_string()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list).post(create))
        .route("/invoices/{id}", get(get_one).put(update).delete(remove))
}

async fn with_relations(
    invoice: invoice::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<InvoiceRecord> {
    let organization = invoice.find_related(organization::Entity).one(db).await?;
    let customer = invoice.find_related(customer::Entity).one(db).await?;
    Ok(InvoiceRecord {
        invoice,
        organization,
        customer,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<InvoiceRecord>>> {
    let invoices = invoice::Entity::find()
        .order_by_desc(invoice::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let organizations = invoices.load_one(organization::Entity, &state.db).await?;
    let customers = invoices.load_one(customer::Entity, &state.db).await?;

    let records = invoices
        .into_iter()
        .zip(organizations)
        .zip(customers)
        .map(|((invoice, organization), customer)| InvoiceRecord {
            invoice,
            organization,
            customer,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateInvoice>,
) -> Result<Json<InvoiceRecord>> {
    let now = Utc::now();
    let model = invoice::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        customer_id: Set(body.customer_id),
        number: Set(body.number),
        amount: Set(body.amount),
        currency: Set(body.currency),
        status: Set(body.status),
        due_date: Set(body.due_date),
        paid_at: Set(body.paid_at),
        external_id: Set(body.external_id),
        metadata: Set(body.metadata),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let invoice = model.insert(&state.db).await?;
    tracing::info!(invoice_id = %invoice.id, number = %invoice.number, "invoice created");
    Ok(Json(with_relations(invoice, &state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<InvoiceRecord>> {
    let invoice = invoice::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice not found"))?;
    Ok(Json(with_relations(invoice, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateInvoice>,
) -> Result<Json<InvoiceRecord>> {
    let existing = invoice::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice not found"))?;

    let mut active: invoice::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(customer_id) = body.customer_id {
        active.customer_id = Set(customer_id);
    }
    if let Some(number) = body.number {
        active.number = Set(number);
    }
    if let Some(amount) = body.amount {
        active.amount = Set(amount);
    }
    if let Some(currency) = body.currency {
        active.currency = Set(currency);
    }
    if let Some(status) = body.status {
        active.status = Set(status);
    }
    if let Some(due_date) = body.due_date {
        active.due_date = Set(due_date);
    }
    if let Some(paid_at) = body.paid_at {
        active.paid_at = Set(paid_at);
    }
    if let Some(external_id) = body.external_id {
        active.external_id = Set(Some(external_id));
    }
    if let Some(metadata) = body.metadata {
        active.metadata = Set(Some(metadata));
    }
    active.updated_at = Set(Utc::now());

    let invoice = active.update(&state.db).await?;
    Ok(Json(with_relations(invoice, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = invoice::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Invoice not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
