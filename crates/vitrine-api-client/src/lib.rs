//! HTTP client for the catalog store.
//!
//! Provides generic JSON helpers that map every failure onto [`ClientError`]
//! (transport, non-2xx status, undecodable body) and domain methods for the
//! persistence and upload endpoints. The console crate builds its upload and
//! submission workflow on top of this client.

pub mod api;
pub mod progress;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use vitrine_core::ConsoleConfig;

pub use api::UploadFile;
pub use progress::{ProgressFn, ProgressTracker};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API request failed with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Field the store blames, when it names one
        field: Option<String>,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Error body shape used by the store: `{"error": "..."}`, sometimes with a
/// `message` instead and an optional `field`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    field: Option<String>,
}

/// HTTP client for the catalog store.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `timeout` of `None` keeps reqwest's default (no overall timeout).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.client.get(self.build_url(path));
        let response = Self::send(request).await?;
        Self::decode_json(response).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.build_url(path)).json(body);
        let response = Self::send(request).await?;
        Self::decode_json(response).await
    }

    /// PUT JSON body and deserialize response.
    pub async fn put_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.client.put(self.build_url(path)).json(body);
        let response = Self::send(request).await?;
        Self::decode_json(response).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        let response = Self::send(request).await?;
        Self::decode_json(response).await
    }

    /// DELETE request. Response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.client.delete(self.build_url(path));
        Self::send(request).await?;
        Ok(())
    }

    /// Send and turn non-2xx responses into [`ClientError::Status`].
    async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let body: ErrorBody = serde_json::from_str(&error_text).unwrap_or_default();
        let message = body
            .error
            .or(body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(error_text);

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
            field: body.field,
        })
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await.map_err(ClientError::Transport)?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(
            client.build_url("/products"),
            "http://localhost:5000/api/products"
        );
    }

    #[test]
    fn from_config_uses_configured_url() {
        let config = ConsoleConfig::new("https://api.example.com/api");
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/api");
    }
}
