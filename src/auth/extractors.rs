use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::app::AppState;
use crate::auth::provider::Session;
use crate::error::AppError;

/// Axum extractor that gates a handler on an admin session.
///
/// This is the first thing every admin resource handler evaluates: no valid
/// token short-circuits with 401, a valid non-admin session with 403, before
/// any body parsing or datastore access happens.
///
/// # Example
///
/// ```rust,ignore
/// async fn list(
///     State(state): State<AppState>,
///     AdminSession(session): AdminSession,
/// ) -> Result<Json<Vec<plan::Model>>> {
///     // session.role is guaranteed to be Role::Admin here
/// }
/// ```
pub struct AdminSession(pub Session);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("Missing authorization token"))?;

        let session = state
            .sessions
            .resolve(&token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid session"))?;

        if !session.role.is_admin() {
            tracing::debug!(user_id = %session.user_id, "non-admin session rejected");
            return Err(AppError::forbidden("Admin access required"));
        }

        Ok(AdminSession(session))
    }
}

/// Extract a bearer token from the Authorization header.
fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123".to_string()));
    }

    #[test]
    fn test_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_empty_token_rejected() {
        let parts = parts_with_auth(Some("Bearer "));
        assert_eq!(bearer_token(&parts), None);
    }
}
