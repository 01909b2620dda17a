//! Typed API port and its error type.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Failure of a single REST call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Failed to serialize request: {0}")]
    SerializeError(String),
}

impl ApiError {
    /// HTTP status of the failure, when the server produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Typed REST access used by application services
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait ApiPort: Clone + Send + Sync + 'static {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError>;

    async fn post<T: DeserializeOwned, B: Serialize + Send + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>;

    fn set_bearer_token(&self, token: Option<String>);
}
