//! HTTP boundary to the home-automation backend.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::category::CategoryConfig;
use crate::entity::{Entity, SwitchState};

/// Why a fetch or command produced no usable entity payload.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request never reached the backend, or timed out
    #[error("backend unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("backend returned status {0}")]
    Status(StatusCode),

    /// Response body does not parse into the expected entity shape
    #[error("malformed backend payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fetch and command operations against the backend.
///
/// Every operation is parameterized by a category descriptor, so one
/// implementation serves all configured categories. Operations are idempotent
/// per entity id on the backend side; callers may retry on the next poll.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the full entity list for a category.
    async fn fetch(&self, category: &CategoryConfig) -> Result<Vec<Entity>, BackendError>;

    /// Requests a switch-like entity to move to `target`.
    ///
    /// Returns the backend's updated entity representation.
    async fn toggle(
        &self,
        category: &CategoryConfig,
        id: &str,
        target: SwitchState,
    ) -> Result<Entity, BackendError>;

    /// Activates a scene-like entity.
    ///
    /// Returns the updated entity carrying its new activation timestamp.
    async fn activate(&self, category: &CategoryConfig, id: &str) -> Result<Entity, BackendError>;
}

/// Connection settings for the REST backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Also the terminal transition for commands
    /// whose response never arrives.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:3123".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// REST implementation of [`Backend`].
///
/// Category fetches are `GET {base_url}{fetch_path}` returning a bare JSON
/// array. Toggles are `POST {base_url}{command_path}/{id}/{on|off}`,
/// activations `POST {base_url}{command_path}/{id}`; both echo the updated
/// entity as JSON.
pub struct RestBackend {
    base_url: String,
    http_client: reqwest::Client,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Sends a command POST and parses the echoed entity.
    async fn post_command(&self, url: String) -> Result<Entity, BackendError> {
        debug!(url = %url, "Sending command");

        let response = self.http_client.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.text().await?;
        let entity = serde_json::from_str(&body)?;
        Ok(entity)
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn fetch(&self, category: &CategoryConfig) -> Result<Vec<Entity>, BackendError> {
        let url = format!("{}{}", self.base_url, category.fetch_path);
        debug!(category = %category.name, url = %url, "Fetching category");

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.text().await?;
        let entities = serde_json::from_str(&body)?;
        Ok(entities)
    }

    async fn toggle(
        &self,
        category: &CategoryConfig,
        id: &str,
        target: SwitchState,
    ) -> Result<Entity, BackendError> {
        let url = format!(
            "{}{}/{}/{}",
            self.base_url,
            category.command_path,
            id,
            target.as_str()
        );
        self.post_command(url).await
    }

    async fn activate(&self, category: &CategoryConfig, id: &str) -> Result<Entity, BackendError> {
        let url = format!("{}{}/{}", self.base_url, category.command_path, id);
        self.post_command(url).await
    }
}
