use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// Platform role attached to a session or user record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Error returned when parsing a role string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError {
    invalid_value: String,
}

impl fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid role: '{}' (expected: ADMIN or USER)",
            self.invalid_value
        )
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(ParseRoleError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authenticated session as supplied by the external auth provider.
///
/// The resource layer only ever inspects `role`; everything else rides along
/// for logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Trait for resolving a bearer token into a session.
///
/// Implement this against whatever auth provider fronts the deployment.
/// Returning `Ok(None)` means the token is unknown or expired.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<Session>>;
}

/// Fixed token-to-session mapping.
///
/// Useful for tests and for single-operator deployments where the admin
/// token is provisioned out of band.
#[derive(Clone, Debug, Default)]
pub struct StaticSessionProvider {
    sessions: HashMap<String, Session>,
}

impl StaticSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, session: Session) -> Self {
        self.sessions.insert(token.into(), session);
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn resolve(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");

        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Admin);
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[tokio::test]
    async fn test_static_provider_resolution() {
        let provider = StaticSessionProvider::new()
            .with_token("tok-1", Session::new("usr_1", Role::Admin));

        let session = provider.resolve("tok-1").await.unwrap().unwrap();
        assert_eq!(session.user_id, "usr_1");
        assert_eq!(session.role, Role::Admin);

        assert!(provider.resolve("unknown").await.unwrap().is_none());
    }
}
