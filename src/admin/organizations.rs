//! Organization resource handlers.

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
use crate::entities::{organization, user};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

/// Owner projection attached to organization responses: contact fields only,
/// never the full user record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub email: String,
    pub name: Option<String>,
}

impl From<user::Model> for OwnerSummary {
    fn from(user: user::Model) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrganizationRecord {
    #[serde(flatten)]
    pub organization: organization::Model,
    pub owner: Option<OwnerSummary>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganization {
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub slug: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub owner_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganization {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub slug: Option<String>,
    pub owner_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", get(list).post(create))
        .route(
            "/organizations/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<OrganizationRecord>>> {
    let organizations = organization::Entity::find()
        .order_by_desc(organization::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let owners = organizations.load_one(user::Entity, &state.db).await?;

    let records = organizations
        .into_iter()
        .zip(owners)
        .map(|(organization, owner)| OrganizationRecord {
            organization,
            owner: owner.map(Into::into),
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateOrganization>,
) -> Result<Json<OrganizationRecord>> {
    let now = Utc::now();
    let model = organization::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(body.name),
        slug: Set(body.slug),
        owner_id: Set(body.owner_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let organization = model.insert(&state.db).await?;
    let owner = organization.find_related(user::Entity).one(&state.db).await?;

    tracing::info!(org_id = %organization.id, slug = %organization.slug, "organization created");

    Ok(Json(OrganizationRecord {
        organization,
        owner: owner.map(Into::into),
    }))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<OrganizationRecord>> {
    let organization = organization::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Organization not found"))?;

    let owner = organization.find_related(user::Entity).one(&state.db).await?;

    Ok(Json(OrganizationRecord {
        organization,
        owner: owner.map(Into::into),
    }))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateOrganization>,
) -> Result<Json<OrganizationRecord>> {
    let existing = organization::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Organization not found"))?;

    let mut active: organization::ActiveModel = existing.into();
    if let Some(name) = body.name {
        active.name = Set(name);
    }
    if let Some(slug) = body.slug {
        active.slug = Set(slug);
    }
    if let Some(owner_id) = body.owner_id {
        active.owner_id = Set(owner_id);
    }
    active.updated_at = Set(Utc::now());

    let organization = active.update(&state.db).await?;
    let owner = organization.find_related(user::Entity).one(&state.db).await?;

    Ok(Json(OrganizationRecord {
        organization,
        owner: owner.map(Into::into),
    }))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = organization::Entity::delete_by_id(&id)
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Organization not found"));
    }

    tracing::info!(org_id = %id, "organization deleted");
    Ok(Json(json!({ "ok": true })))
}
