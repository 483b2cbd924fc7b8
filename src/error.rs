use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

/// The main error type for Ledgerline handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(HashMap<String, Vec<String>>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Standard error response format for API errors.
///
/// Every error body is `{"error": ...}`-shaped; validation failures
/// additionally carry the full per-field breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Anyhow(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns an error message safe for client responses.
    ///
    /// Client errors (4xx) expose their message since the caller needs to
    /// know what went wrong. Server errors (5xx) collapse to a generic
    /// string; the real cause is logged server-side only.
    fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::Validation(_) => "Validation failed".to_string(),
            Self::Unauthorized(msg) => format!("Unauthorized: {}", msg),
            Self::Forbidden(msg) => format!("Forbidden: {}", msg),
            Self::Conflict(msg) => format!("Conflict: {}", msg),
            Self::Internal(_) | Self::Anyhow(_) => "Internal server error".to_string(),
            Self::Database(_) => "Database error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full error detail goes to the server log, never the client.
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let field_errors = match &self {
            Self::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            field_errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for Ledgerline handlers
pub type Result<T> = std::result::Result<T, AppError>;

// Common error type conversions

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            AppError::BadRequest(format!("JSON error: {}", err))
        } else {
            AppError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        // Uniqueness violations are surfaced as a distinct Conflict kind
        // (duplicate slug / email / invoice number) instead of a generic
        // persistence failure.
        if let Some(sql_err) = err.sql_err() {
            if matches!(sql_err, sea_orm::SqlErr::UniqueConstraintViolation(_)) {
                return AppError::Conflict("Resource already exists".to_string());
            }
            if matches!(sql_err, sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) {
                return AppError::Conflict("Referenced record constraint failed".to_string());
            }
        }

        match &err {
            sea_orm::DbErr::RecordNotFound(msg) => AppError::NotFound(if msg.is_empty() {
                "Record not found".to_string()
            } else {
                msg.clone()
            }),
            _ => AppError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = AppError::not_found("Plan not found");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error() {
        let err = AppError::conflict("slug taken");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.safe_message(), "Conflict: slug taken");
    }

    #[test]
    fn test_unauthorized_before_forbidden_status() {
        assert_eq!(
            AppError::unauthorized("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden("admin only").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_safe_message_server_errors_hidden() {
        assert_eq!(
            AppError::internal("db password is 'secret123'").safe_message(),
            "Internal server error"
        );
        assert_eq!(
            AppError::Database("relation \"users\" does not exist".to_string()).safe_message(),
            "Database error"
        );
    }

    #[test]
    fn test_validation_carries_every_field() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), vec!["invalid".to_string()]);
        fields.insert("slug".to_string(), vec!["required".to_string()]);
        let err = AppError::Validation(fields);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_validation_response_body_lists_fields() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), vec!["invalid email".to_string()]);
        let response = AppError::Validation(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["fieldErrors"]["email"][0], "invalid email");
    }

    #[tokio::test]
    async fn test_internal_response_hides_detail() {
        let response = AppError::internal("connection to db-prod-01:5432 failed").into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("fieldErrors").is_none());
    }

    #[test]
    fn test_from_serde_json_syntax_error() {
        let result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ invalid json }");
        let err: AppError = result.unwrap_err().into();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
