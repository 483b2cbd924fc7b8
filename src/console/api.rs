//! HTTP transport for the console.
//!
//! The console talks to the Resource Access Layer through the [`ResourceApi`]
//! trait so tests can substitute an in-memory double; production uses the
//! reqwest-backed [`HttpResourceClient`].

use async_trait::async_trait;
use serde_json::Value;

/// Error surfaced by console operations.
///
/// Console errors are displayed inline and never abort the console; there is
/// no automatic retry.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        ConsoleError::Transport(err.to_string())
    }
}

/// Uniform five-operation surface of one admin resource.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list(&self, resource: &str) -> Result<Vec<Value>, ConsoleError>;
    async fn get(&self, resource: &str, id: &str) -> Result<Value, ConsoleError>;
    async fn create(&self, resource: &str, body: &Value) -> Result<Value, ConsoleError>;
    async fn update(&self, resource: &str, id: &str, body: &Value) -> Result<Value, ConsoleError>;
    async fn delete(&self, resource: &str, id: &str) -> Result<(), ConsoleError>;
}

/// Admin API client over HTTP with a bearer token.
#[derive(Clone)]
pub struct HttpResourceClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpResourceClient {
    /// `base_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, resource: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/api/admin/{}/{}", self.base_url, resource, id),
            None => format!("{}/api/admin/{}", self.base_url, resource),
        }
    }

    async fn decode(response: reqwest::Response) -> Result<Value, ConsoleError> {
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| ConsoleError::Decode(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(ConsoleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Fetch the dashboard stats overview.
    pub async fn stats(&self) -> Result<Value, ConsoleError> {
        let response = self
            .http
            .get(format!("{}/api/admin/stats", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl ResourceApi for HttpResourceClient {
    async fn list(&self, resource: &str) -> Result<Vec<Value>, ConsoleError> {
        let response = self
            .http
            .get(self.url(resource, None))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let body = Self::decode(response).await?;

        match body {
            Value::Array(items) => Ok(items),
            other => Err(ConsoleError::Decode(format!(
                "expected an array, got {}",
                other
            ))),
        }
    }

    async fn get(&self, resource: &str, id: &str) -> Result<Value, ConsoleError> {
        let response = self
            .http
            .get(self.url(resource, Some(id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create(&self, resource: &str, body: &Value) -> Result<Value, ConsoleError> {
        let response = self
            .http
            .post(self.url(resource, None))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update(&self, resource: &str, id: &str, body: &Value) -> Result<Value, ConsoleError> {
        let response = self
            .http
            .put(self.url(resource, Some(id)))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, resource: &str, id: &str) -> Result<(), ConsoleError> {
        let response = self
            .http
            .delete(self.url(resource, Some(id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = HttpResourceClient::new("http://localhost:8000/", "tok");
        assert_eq!(
            client.url("invoices", None),
            "http://localhost:8000/api/admin/invoices"
        );
        assert_eq!(
            client.url("invoices", Some("inv_1")),
            "http://localhost:8000/api/admin/invoices/inv_1"
        );
    }
}
