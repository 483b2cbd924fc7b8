//! API key resource handlers.
//!
//! Creation is the only moment the raw secret exists in a response: the key
//! is generated server-side, hashed for storage, and returned once as
//! `rawKey` alongside the stored record. Every later read exposes only the
//! truncated `keyPrefix`.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rand::RngCore;
use sea_orm::{ActiveModelTrait, EntityTrait, LoaderTrait, ModelTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write as _;
use uuid::Uuid;
use validator::Validate;

use crate::admin::double_option;
use crate::app::AppState;
use crate::auth::AdminSession;
use crate::entities::{api_key, organization};
use crate::error::{AppError, Result};
use crate::validation::ValidatedJson;

/// Display prefix length, counted over the raw key including `llk_`.
const PREFIX_LEN: usize = 12;

#[derive(Debug, Serialize)]
pub struct ApiKeyRecord {
    #[serde(flatten)]
    pub api_key: api_key::Model,
    pub organization: Option<organization::Model>,
}

/// Creation response: the stored record plus the one-time raw secret.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyCreated {
    #[serde(flatten)]
    pub record: ApiKeyRecord,
    pub raw_key: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKey {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub organization_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApiKey {
    pub organization_id: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    /// Nullable: explicit null removes the expiry.
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Generate a fresh raw API key: `llk_` followed by 32 random bytes, hex.
fn generate_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);

    let mut key = String::with_capacity(4 + bytes.len() * 2);
    key.push_str("llk_");
    for byte in bytes {
        let _ = write!(key, "{:02x}", byte);
    }
    key
}

/// Truncated, non-secret derivative shown in listings.
fn key_prefix(raw_key: &str) -> String {
    format!("{}...", &raw_key[..PREFIX_LEN])
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api-keys", get(list).post(create))
        .route("/api-keys/{id}", get(get_one).put(update).delete(remove))
}

async fn with_organization(
    api_key: api_key::Model,
    db: &sea_orm::DatabaseConnection,
) -> Result<ApiKeyRecord> {
    let organization = api_key.find_related(organization::Entity).one(db).await?;
    Ok(ApiKeyRecord {
        api_key,
        organization,
    })
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<ApiKeyRecord>>> {
    let keys = api_key::Entity::find()
        .order_by_desc(api_key::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let organizations = keys.load_one(organization::Entity, &state.db).await?;

    let records = keys
        .into_iter()
        .zip(organizations)
        .map(|(api_key, organization)| ApiKeyRecord {
            api_key,
            organization,
        })
        .collect();

    Ok(Json(records))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    ValidatedJson(body): ValidatedJson<CreateApiKey>,
) -> Result<Json<ApiKeyCreated>> {
    let raw_key = generate_key();
    let key_hash = state.hasher.hash(&raw_key)?;

    let now = Utc::now();
    let model = api_key::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        organization_id: Set(body.organization_id),
        name: Set(body.name),
        key_hash: Set(key_hash),
        key_prefix: Set(key_prefix(&raw_key)),
        last_used_at: Set(None),
        expires_at: Set(body.expires_at),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let api_key = model.insert(&state.db).await?;
    tracing::info!(api_key_id = %api_key.id, prefix = %api_key.key_prefix, "api key issued");

    let record = with_organization(api_key, &state.db).await?;
    Ok(Json(ApiKeyCreated { record, raw_key }))
}

async fn get_one(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyRecord>> {
    let api_key = api_key::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("API key not found"))?;
    Ok(Json(with_organization(api_key, &state.db).await?))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateApiKey>,
) -> Result<Json<ApiKeyRecord>> {
    let existing = api_key::Entity::find_by_id(&id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found("API key not found"))?;

    let mut active: api_key::ActiveModel = existing.into();
    if let Some(organization_id) = body.organization_id {
        active.organization_id = Set(organization_id);
    }
    if let Some(name) = body.name {
        active.name = Set(name);
    }
    if let Some(expires_at) = body.expires_at {
        active.expires_at = Set(expires_at);
    }
    active.updated_at = Set(Utc::now());

    let api_key = active.update(&state.db).await?;
    Ok(Json(with_organization(api_key, &state.db).await?))
}

async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let result = api_key::Entity::delete_by_id(&id).exec(&state.db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::not_found("API key not found"));
    }

    tracing::info!(api_key_id = %id, "api key revoked");
    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_format() {
        let key = generate_key();
        assert!(key.starts_with("llk_"));
        assert_eq!(key.len(), 4 + 64);
        assert!(key[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_keys_are_unique() {
        assert_ne!(generate_key(), generate_key());
    }

    #[test]
    fn test_prefix_is_truncated_and_non_secret() {
        let key = generate_key();
        let prefix = key_prefix(&key);
        assert_eq!(prefix.len(), PREFIX_LEN + 3);
        assert!(prefix.ends_with("..."));
        assert!(key.starts_with(&prefix[..PREFIX_LEN]));
        // The prefix reveals only 8 of the 64 secret hex chars.
        assert!(prefix.len() < key.len());
    }
}
