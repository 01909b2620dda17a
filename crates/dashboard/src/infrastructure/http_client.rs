//! REST adapter for the game server.
//!
//! Desktop uses reqwest, the browser build uses gloo-net. Both attach the
//! session bearer token (when one is installed) and turn non-2xx answers into
//! `ApiError::HttpError` carrying the server's `{error}` message.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;

use crate::ports::outbound::{ApiError, RawApiPort};

/// Default game server base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// HTTP client for the game server REST API
#[derive(Clone)]
pub struct ApiAdapter {
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::Client,
    base_url: String,
    bearer: Arc<RwLock<Option<String>>>,
}

impl ApiAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        // Browsers own request timeouts
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Self {
            #[cfg(not(target_arch = "wasm32"))]
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer_token(&self) -> Option<String> {
        match self.bearer.read() {
            Ok(guard) => guard.clone(),
            Err(e) => e.into_inner().clone(),
        }
    }
}

impl Default for ApiAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(15))
    }
}

/// Server-provided message of a failed response.
///
/// Prefers the `{error}` (then `{message}`) field, then a plain-text body.
/// `None` leaves the wording to the caller, which knows the context.
pub fn error_message(body: &str) -> Option<String> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        return ["error", "message"]
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|message| !message.trim().is_empty())
            .map(str::to_string);
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('<') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Decode a successful body; empty bodies read as `null`.
fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::ParseError(e.to_string()))
}

// =============================================================================
// Desktop (reqwest)
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl ApiAdapter {
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let request = match self.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::HttpError {
                status: status.as_u16(),
                message: error_message(&body).unwrap_or_default(),
            });
        }
        parse_body(&body)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait]
impl RawApiPort for ApiAdapter {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        tracing::debug!(path, "GET");
        self.execute(self.client.get(self.url(path))).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        tracing::debug!(path, "POST");
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    fn set_bearer_token(&self, token: Option<String>) {
        match self.bearer.write() {
            Ok(mut guard) => *guard = token,
            Err(e) => *e.into_inner() = token,
        }
    }
}

// =============================================================================
// WASM (gloo-net)
// =============================================================================

#[cfg(target_arch = "wasm32")]
impl ApiAdapter {
    fn with_auth(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match self.bearer_token() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn execute(&self, request: gloo_net::http::Request) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::HttpError {
                status,
                message: error_message(&body).unwrap_or_default(),
            });
        }
        parse_body(&body)
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait::async_trait(?Send)]
impl RawApiPort for ApiAdapter {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let request = self
            .with_auth(gloo_net::http::Request::get(&self.url(path)))
            .build()
            .map_err(|e| ApiError::SerializeError(e.to_string()))?;
        self.execute(request).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let request = self
            .with_auth(gloo_net::http::Request::post(&self.url(path)))
            .json(body)
            .map_err(|e| ApiError::SerializeError(e.to_string()))?;
        self.execute(request).await
    }

    fn set_bearer_token(&self, token: Option<String>) {
        match self.bearer.write() {
            Ok(mut guard) => *guard = token,
            Err(e) => *e.into_inner() = token,
        }
    }
}
