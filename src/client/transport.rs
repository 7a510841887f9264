use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;
use tracing::debug;

use crate::common::error::AdminError;
use crate::config::settings::ClientConfig;

use super::descriptor::Endpoint;

/// Boundary to the back office REST API. Implementations return the raw JSON
/// envelope; callers deserialize it into the expected shape.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        endpoint: &Endpoint,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, AdminError>;
}

/// Production transport over reqwest with bearer auth and a fixed timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: url::Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, AdminError> {
        let base_url = url::Url::parse(&config.api_base_url)
            .map_err(|e| AdminError::Transport(format!("invalid API base url: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AdminError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        endpoint: &Endpoint,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, AdminError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AdminError::Transport(format!("invalid path {path}: {e}")))?;

        debug!(method = %endpoint.method, %url, "executing request");

        let mut request = self.client.request(endpoint.method.clone(), url).query(query);
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdminError::Transport(e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| AdminError::Transport(e.to_string()))
    }
}
