//! Integration resource handlers.
//!
//! `config` is accepted and returned as an opaque object; nothing inspects
//! its contents beyond it being valid JSON.

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
use crate::entities::integration::{self, IntegrationType};
use crate::entities::organization;
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct IntegrationRecord {
    #[serde(flatten)]
    pub integration: integration::Model,
    pub organization: Option<organization::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntegration {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    #[serde(rename = "type")]
    pub integration_type: IntegrationType,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub config: Option<serde_json::Value>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntegration {
    pub organization_id: Option<String>,
    #[serde(rename = "type")]
    pub integration_type: Option<IntegrationType>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub config: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

fn default_is_active() -> bool {
    true
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/integrations", get(list).post(create))
        .route(
            "/integrations/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn with_organization(
    integration: integration::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<IntegrationRecord> {
    let organization = integration
        .find_related(organization::Entity)
        .one(db)
        .await?;
    Ok(IntegrationRecord {
        integration,
        organization,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<IntegrationRecord>>> {
    let integrations = integration::Entity::find()
        .order_by_desc(integration::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let organizations = integrations
        .load_one(organization::Entity, &state.db)
        .await?;

    let records = integrations
        .into_iter()
        .zip(organizations)
        .map(|(integration, organization)| IntegrationRecord {
            integration,
            organization,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateIntegration>,
) -> Result<Json<IntegrationRecord>> {
    let now = Utc::now();
    let model = integration::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        integration_type: Set(body.integration_type.as_str().to_string()),
        name: Set(body.name),
        config: Set(body.config),
        is_active: Set(body.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let integration = model.insert(&state.db).await?;
    tracing::info!(integration_id = %integration.id, kind = %integration.integration_type, "integration created");
    Ok(Json(with_organization(integration, &state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<IntegrationRecord>> {
    let integration = integration::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Integration not found"))?;
    Ok(Json(with_organization(integration, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateIntegration>,
) -> Result<Json<IntegrationRecord>> {
    let existing = integration::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Integration not found"))?;

    let mut active: integration::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(integration_type) = body.integration_type {
        active.integration_type = Set(integration_type.as_str().to_string());
    }
    if let Some(name) = body.name {
        active.name = Set(name);
    }
    if let Some(config) = body.config {
        active.config = Set(Some(config));
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());

    let integration = active.update(&state.db).await?;
    Ok(Json(with_organization(integration, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = integration::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Integration not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
