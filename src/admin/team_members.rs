//! Team member resource handlers.

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
use crate::entities::{organization, team_member, user};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Serialize)]
pub struct TeamMemberRecord {
    #[serde(flatten)]
    pub member: team_member::Model,
    pub user: Option<user::Model>,
    pub organization: Option<organization::Model>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMember {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub user_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMember {
    pub user_id: Option<String>,
    pub organization_id: Option<String>,
    pub role: Option<String>,
}

fn default_role() -> String {
    "member".to_string()
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/team-members", get(list).post(create))
        .route(
            "/team-members/{id}",
            get(get_one).put(update).delete(remove),
        )
}

async fn with_relations(
    member: team_member::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<TeamMemberRecord> {
    let user = member.find_related(user::Entity).one(db).await?;
    let organization = member.find_related(organization::Entity).one(db).await?;
    Ok(TeamMemberRecord {
        member,
        user,
        organization,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<TeamMemberRecord>>> {
    let members = team_member::Entity::find()
        .order_by_desc(team_member::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let users = members.load_one(user::Entity, &state.db).await?;
    let organizations = members.load_one(organization::Entity, &state.db).await?;

    let records = members
        .into_iter()
        .zip(users)
        .zip(organizations)
        .map(|((member, user), organization)| TeamMemberRecord {
            member,
            user,
            organization,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateTeamMember>,
) -> Result<Json<TeamMemberRecord>> {
    let now = Utc::now();
    let model = team_member::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(body.user_id),
        organization_id: Set(body.organization_id),
        role: Set(body.role),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let member = model.insert(&state.db).await?;
    tracing::info!(member_id = %member.id, "team member added");
    Ok(Json(with_relations(member, &state.db).await?))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<TeamMemberRecord>> {
    let member = team_member::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Team member not found"))?;
    Ok(Json(with_relations(member, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateTeamMember>,
) -> Result<Json<TeamMemberRecord>> {
    let existing = team_member::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("Team member not found"))?;

    let mut active: team_member::ActiveModel = existing.into();
    if let Some(user_id) = body.user_id {
        active.user_id = Set(user_id);
    }
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(role) = body.role {
        active.role = Set(role);
    }
    active.updated_at = Set(Utc::now());

    let member = active.update(&state.db).await?;
    Ok(Json(with_relations(member, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = team_member::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("Team member not found"));
    }

    Ok(Json(json!({ "ok": true })))
}
