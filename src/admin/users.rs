//! User resource handlers.
//!
//! Incoming plaintext passwords are hashed before storage and the hash never
//! appears in a response (the entity skips serializing it). Updates only
//! re-hash when a new password is explicitly supplied.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::auth::{AdminSession, Role};
use crate::entities::user;
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(default)]
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    pub name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/{id}", get(get_one).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<user::Model>>> {
    let users = user::Entity::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(users))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateUser>,
) -> Result<Json<user::Model>> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&body.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::conflict("User already exists"));
    }

    let password_hash = state.hasher.hash(&body.password)?;

    let now = Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        email: Set(body.email),
        password_hash: Set(password_hash),
        name: Set(body.name),
        role: Set(body.role.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let user = model.insert(&state.db).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "user created");
    Ok(Json(user))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<user::Model>> {
    let user = user::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateUser>,
) -> Result<Json<user::Model>> {
    let existing = user::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let mut active: user::ActiveModel = existing.into();
    if let Some(email) = body.email {
        active.email = Set(email);
    }
    if let Some(name) = body.name {
        active.name = Set(Some(name));
    }
    if let Some(role) = body.role {
        active.role = Set(role.as_str().to_string());
    }
    if let Some(password) = body.password {
        active.password_hash = Set(state.hasher.hash(&password)?);
    }
    active.updated_at = Set(Utc::now());

    let user = active.update(&state.db).await?;
    Ok(Json(user))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = user::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(json!({ "ok": true })))
}
