//! Subscription resource handlers.

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

use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::{organization, plan, subscription};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct SubscriptionRecord {
    #[serde(flatten)]
    pub subscription: subscription::Model,
    pub organization: Option<organization::Model>,
    pub plan: Option<plan::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscription {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub plan_id: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub external_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscription {
    pub organization_id: Option<String>,
    pub plan_id: Option<String>,
    pub status: Option<String>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub external_id: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subscriptions", get(list).post(create))
        .route(
            "/subscriptions/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn with_relations(
    subscription: subscription::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<SubscriptionRecord> {
    let organization = subscription
        .find_related(organization::Entity)
        .one(db)
        .await?;
    let plan = subscription.find_related(plan::Entity).one(db).await?;
    Ok(SubscriptionRecord {
        subscription,
        organization,
        plan,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<SubscriptionRecord>>> {
    let subscriptions = subscription::Entity::find()
        .order_by_desc(subscription::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let organizations = subscriptions
        .load_one(organization::Entity, &state.db)
        .await?;
    let plans = subscriptions.load_one(plan::Entity, &state.db).await?;

    let records = subscriptions
        .into_iter()
        .zip(organizations)
        .zip(plans)
        .map(|((subscription, organization), plan)| SubscriptionRecord {
            subscription,
            organization,
            plan,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateSubscription>,
) -> Result<Json<SubscriptionRecord>> {
    let now = Utc::now();
    let model = subscription::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        plan_id: Set(body.plan_id),
        status: Set(body.status),
        current_period_start: Set(body.current_period_start),
        current_period_end: Set(body.current_period_end),
        external_id: Set(body.external_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let subscription = model.insert(&state.db).await?;
    tracing::info!(subscription_id = %subscription.id, "subscription created");
    Ok(Json(with_relations(subscription, &state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionRecord>> {
    let subscription = subscription::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Subscription not found"))?;
    Ok(Json(with_relations(subscription, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateSubscription>,
) -> Result<Json<SubscriptionRecord>> {
    let existing = subscription::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Subscription not found"))?;

    let mut active: subscription::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(plan_id) = body.plan_id {
        active.plan_id = Set(plan_id);
    }
    if let Some(status) = body.status {
        active.status = Set(status);
    }
    if let Some(start) = body.current_period_start {
        active.current_period_start = Set(start);
    }
    if let Some(end) = body.current_period_end {
        active.current_period_end = Set(end);
    }
    if let Some(external_id) = body.external_id {
        active.external_id = Set(Some(external_id));
    }
    active.updated_at = Set(Utc::now());

    let subscription = active.update(&state.db).await?;
    Ok(Json(with_relations(subscription, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = subscription::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Subscription not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
