//! Errors surfaced by application services.

use thiserror::Error;

use crate::ports::outbound::ApiError;

/// Failure of a user-facing operation.
///
/// `Display` is the message shown to the admin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Rejected locally before any request was made
    #[error("{0}")]
    Validation(String),
    /// Wrong credentials or insufficient role
    #[error("{0}")]
    Auth(String),
    /// The resource already exists (e.g. email in use)
    #[error("{0}")]
    Conflict(String),
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Unexpected response from the server: {0}")]
    Parse(String),
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RequestFailed(reason) => ServiceError::Network(reason),
            ApiError::HttpError { status, message } => {
                let message = if message.trim().is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    message
                };
                match status {
                    401 | 403 => ServiceError::Auth(message),
                    409 => ServiceError::Conflict(message),
                    _ => ServiceError::Server { status, message },
                }
            }
            ApiError::ParseError(reason) | ApiError::SerializeError(reason) => {
                ServiceError::Parse(reason)
            }
        }
    }
}

impl ServiceError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ServiceError::Auth(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_statuses_map_to_categories() {
        let auth: ServiceError = ApiError::HttpError {
            status: 403,
            message: "Forbidden".into(),
        }
        .into();
        assert_eq!(auth, ServiceError::Auth("Forbidden".into()));
        assert!(auth.is_auth());

        let conflict: ServiceError = ApiError::HttpError {
            status: 409,
            message: "taken".into(),
        }
        .into();
        assert_eq!(conflict, ServiceError::Conflict("taken".into()));

        let server: ServiceError = ApiError::HttpError {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(server.to_string(), "boom");

        let bare: ServiceError = ApiError::HttpError {
            status: 502,
            message: String::new(),
        }
        .into();
        assert_eq!(bare.to_string(), "Request failed with status 502");
    }

    #[test]
    fn transport_and_parse_failures() {
        assert!(matches!(
            ServiceError::from(ApiError::RequestFailed("refused".into())),
            ServiceError::Network(_)
        ));
        assert!(matches!(
            ServiceError::from(ApiError::ParseError("eof".into())),
            ServiceError::Parse(_)
        ));
    }
}
