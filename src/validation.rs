//! Request body validation.
//!
//! Payload structs derive [`validator::Validate`]; the [`ValidatedJson`]
//! extractor deserializes and validates in one step, collecting **every**
//! failing field into the error response rather than stopping at the first.
//!
//! # Example
//!
//! ```rust,no_run
//! use ledgerline::ValidatedJson;
//! use validator::Validate;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Validate)]
//! struct CreateCustomer {
//!     #[validate(email)]
//!     email: String,
//! }
//!
//! async fn create(
//!     ValidatedJson(body): ValidatedJson<CreateCustomer>,
//! ) -> ledgerline::Result<axum::Json<serde_json::Value>> {
//!     // body is guaranteed to be valid
//!     Ok(axum::Json(serde_json::json!({"status": "ok"})))
//! }
//! ```

use axum::{extract::Request, Json};
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

use crate::error::AppError;

/// Wrapper for validated JSON request bodies.
pub struct ValidatedJson<T>(pub T);

impl<T, S> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    T: for<'de> Deserialize<'de> + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json: Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(format!("Invalid JSON: {}", e)))?;

        json.0.validate().map_err(field_errors)?;

        Ok(ValidatedJson(json.0))
    }
}

/// Flatten validator output into a field -> messages map.
///
/// Field names are reported in their wire (camelCase) form, matching the
/// payload the client actually sent.
fn field_errors(errors: validator::ValidationErrors) -> AppError {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();

    for (field, errs) in errors.field_errors() {
        let messages = errs
            .iter()
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string())
            })
            .collect();
        fields.insert(camel_case(&field), messages);
    }

    AppError::Validation(fields)
}

/// Convert a snake_case struct field name to its camelCase wire name.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(email(message = "must be a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(length(min = 1, message = "is required"))]
        owner_id: String,
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let payload = Payload {
            email: "not-an-email".to_string(),
            name: String::new(),
            owner_id: String::new(),
        };

        let err = field_errors(payload.validate().unwrap_err());
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["email"], vec!["must be a valid email"]);
        assert_eq!(fields["name"], vec!["must not be empty"]);
        // Wire names, not struct field names.
        assert_eq!(fields["ownerId"], vec!["is required"]);
    }

    #[test]
    fn test_camel_case_conversion() {
        assert_eq!(camel_case("owner_id"), "ownerId");
        assert_eq!(camel_case("current_period_start"), "currentPeriodStart");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn test_valid_payload_passes() {
        let payload = Payload {
            email: "billing@acme.test".to_string(),
            name: "Acme".to_string(),
            owner_id: "usr_1".to_string(),
        };
        assert!(payload.validate().is_ok());
    }
}
