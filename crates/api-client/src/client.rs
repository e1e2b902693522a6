use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{CallError, CallResult};
use crate::request::{ApiRequest, Method};
use crate::transport::Transport;

/// HTTP transport for the panel web API.
///
/// Paths are appended to the base URL as-is; the bearer token, when set, is
/// attached to every request. Timeouts are enforced by the underlying
/// `reqwest::Client` and surface as transport errors.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Create a new client with the given base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> CallResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CallError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn set_auth(&mut self, token: String) {
        self.auth_token = Some(token);
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build(&self, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.auth_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

impl Transport for ApiClient {
    async fn send(&self, request: ApiRequest) -> CallResult<Value> {
        debug!("{} {}", request.method, self.url(&request.path));
        let resp = self
            .build(&request)
            .send()
            .await
            .map_err(|e| CallError::Transport(transport_message(&e)))?;
        parse_response(resp).await
    }
}

fn transport_message(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

/// Parse an HTTP response: return the JSON body on 2xx,
/// or a transport error containing the status and body text.
async fn parse_response(resp: reqwest::Response) -> CallResult<Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(CallError::Transport(format!("{status}: {body}")));
    }
    resp.json()
        .await
        .map_err(|e| CallError::Transport(format!("invalid response body: {e}")))
}
