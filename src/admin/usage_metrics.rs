//! Usage metric resource handlers.
//!
//! High-volume table: listings return the 500 most recent entries.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::usage_metric;
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

const LIST_LIMIT: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsageMetric {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub metric_type: String,
    pub value: f64,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub period: String,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsageMetric {
    pub organization_id: Option<String>,
    pub metric_type: Option<String>,
    pub value: Option<f64>,
    pub period: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/usage-metrics", get(list).post(create))
        .route(
            "/usage-metrics/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<usage_metric::Model>>> {
    let metrics = usage_metric::Entity::find()
        .order_by_desc(usage_metric::Column::CreatedAt)
        .limit(LIST_LIMIT)
        .all(&state.db)
        .await?;
    Ok(Json(metrics))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateUsageMetric>,
) -> Result<Json<usage_metric::Model>> {
    let now = Utc::now();
    let model = usage_metric::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        metric_type: Set(body.metric_type),
        value: Set(body.value),
        period: Set(body.period),
        metadata: Set(body.metadata),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let metric = model.insert(&state.db).await?;
    Ok(Json(metric))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<usage_metric::Model>> {
    let metric = usage_metric::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Usage metric not found"))?;
    Ok(Json(metric))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateUsageMetric>,
) -> Result<Json<usage_metric::Model>> {
    let existing = usage_metric::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Usage metric not found"))?;

    let mut active: usage_metric::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(metric_type) = body.metric_type {
        active.metric_type = Set(metric_type);
    }
    if let Some(value) = body.value {
        active.value = Set(value);
    }
    if let Some(period) = body.period {
        active.period = Set(period);
    }
    if let Some(metadata) = body.metadata {
        active.metadata = Set(Some(metadata));
    }
    active.updated_at = Set(Utc::now());

    let metric = active.update(&state.db).await?;
    Ok(Json(metric))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = usage_metric::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Usage metric not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
