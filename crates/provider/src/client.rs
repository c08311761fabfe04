//! HTTP transport for the Grafana API

use std::time::Duration;

use async_trait::async_trait;
use grafsync_common::{ApiResponse, ConnectionConfig, Error, Method, Result, Transport};
use serde_json::Value;
use tracing::debug;

/// Basic-auth JSON client bound to one Grafana server
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl HttpTransport {
    /// Build a transport from validated connection settings
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.user, Some(&self.password))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(format!("{}: {}", url, e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("{}: {}", url, e)))?;

        debug!("{} -> HTTP {}", url, status);
        Ok(ApiResponse { status, body })
    }
}
