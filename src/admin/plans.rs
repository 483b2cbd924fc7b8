//! Plan resource handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::plan::{self, PlanType};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlan {
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    pub features: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlan {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub plan_type: Option<PlanType>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub features: Option<serde_json::Value>,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_interval() -> String {
    "month".to_string()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list).post(create))
        .route("/plans/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<plan::Model>>> {
    let plans = plan::Entity::find()
        .order_by_desc(plan::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(plans))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreatePlan>,
) -> Result<Json<plan::Model>> {
    let now = Utc::now();
    let model = plan::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(body.name),
        plan_type: Set(body.plan_type.as_str().to_string()),
        price: Set(body.price),
        currency: Set(body.currency),
        interval: Set(body.interval),
        features: Set(body.features),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let plan = model.insert(&state.db).await?;
    tracing::info!(plan_id = %plan.id, name = %plan.name, "plan created");
    Ok(Json(plan))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<plan::Model>> {
    let plan = plan::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Plan not found"))?;
    Ok(Json(plan))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdatePlan>,
) -> Result<Json<plan::Model>> {
    let existing = plan::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Plan not found"))?;

    let mut active: plan::ActiveModel = existing.into();
    if let Some(name) = body.name {
        active.name = Set(name);
    }
    if let Some(plan_type) = body.plan_type {
        active.plan_type = Set(plan_type.as_str().to_string());
    }
    if let Some(price) = body.price {
        active.price = Set(price);
    }
    if let Some(currency) = body.currency {
        active.currency = Set(currency);
    }
    if let Some(interval) = body.interval {
        active.interval = Set(interval);
    }
    if let Some(features) = body.features {
        active.features = Set(Some(features));
    }
    active.updated_at = Set(Utc::now());

    let plan = active.update(&state.db).await?;
    Ok(Json(plan))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = plan::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Plan not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
