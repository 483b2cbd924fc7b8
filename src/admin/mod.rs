//! Resource Access Layer.
//!
//! One handler module per entity, each exposing the same five-operation
//! surface under `/api/admin/{entity}`:
//!
//! ```text
//! GET    /{entity}        list, newest first, relations attached
//! POST   /{entity}        validated create
//! GET    /{entity}/{id}   single record or 404
//! PUT    /{entity}/{id}   partial update
//! DELETE /{entity}/{id}   hard delete -> {"ok": true}
//! ```
//!
//! Every handler evaluates the [`AdminSession`](crate::auth::AdminSession)
//! gate before anything else. Handlers are stateless per-request functions;
//! all durable state belongs to the database.

pub mod api_keys;
pub mod customers;
pub mod integrations;
pub mod invoices;
pub mod organizations;
pub mod plans;
pub mod revenue_events;
pub mod stats;
pub mod subscriptions;
pub mod team_members;
pub mod usage_metrics;
pub mod users;

use axum::{routing::get, Router};
use serde::{Deserialize, Deserializer};

use crate::app::AppState;

/// All admin resource routes, ready to nest under `/api/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(organizations::routes())
        .merge(users::routes())
        .merge(plans::routes())
        .merge(subscriptions::routes())
        .merge(customers::routes())
        .merge(revenue_events::routes())
        .merge(invoices::routes())
        .merge(integrations::routes())
        .merge(api_keys::routes())
        .merge(team_members::routes())
        .merge(usage_metrics::routes())
        .route("/stats", get(stats::overview))
}

/// Deserializer for tri-state update fields on nullable columns.
///
/// Field absent => `None` (leave unchanged); field `null` => `Some(None)`
/// (clear); field present => `Some(Some(value))` (set). Use with
/// `#[serde(default, deserialize_with = "crate::admin::double_option")]`.
pub(crate) fn double_option<'de, T, D>(
    deserializer: D,
) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Patch {
        #[serde(default, deserialize_with = "super::double_option")]
        expires_at: Option<Option<DateTime<Utc>>>,
    }

    #[test]
    fn test_absent_means_unchanged() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert!(patch.expires_at.is_none());
    }

    #[test]
    fn test_null_means_clear() {
        let patch: Patch = serde_json::from_str(r#"{"expiresAt": null}"#).unwrap();
        assert_eq!(patch.expires_at, Some(None));
    }

    #[test]
    fn test_value_means_set() {
        let patch: Patch =
            serde_json::from_str(r#"{"expiresAt": "2026-12-31T00:00:00Z"}"#).unwrap();
        let inner = patch.expires_at.unwrap().unwrap();
        assert_eq!(inner.to_rfc3339(), "2026-12-31T00:00:00+00:00");
    }
}
