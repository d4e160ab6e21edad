//
//  octane-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API types shared by every Octane operation.
//!
//! This module contains the error type returned by the client and the
//! envelope helpers used to turn Octane's `{"data": ...}` responses into flat
//! entities.
//!
//! # Overview
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`ApiError`] | Error type for all client operations |
//! | [`envelope`] | Response normalization and field projection |
//! | [`DataEnvelope`] | Typed `{"data": [...]}` request/response body |

pub mod envelope;

pub use envelope::*;

use std::error::Error as StdError;
use std::io;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Convenience alias used throughout the API layer.
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Unified error type for all Octane API operations.
///
/// Errors are passed through largely as received from the transport layer.
/// The only structured decision made on them is [`ApiError::is_transient`],
/// which drives the retry loop of bulk creates.
///
/// # Variants
///
/// | Variant | Description |
/// |---------|-------------|
/// | `InvalidConfig` | The client configuration cannot produce valid requests |
/// | `Http` | The server answered with a non-2xx status |
/// | `Network` | The request never produced a response |
/// | `Decode` | The body was not the JSON we expected |
/// | `UnexpectedShape` | The JSON was valid but not an entity or entity list |
/// | `UnknownEntityType` | A logical entity name outside the catalog |
///
/// # Example
///
/// ```rust
/// use octane_cli::api::ApiError;
/// use reqwest::StatusCode;
///
/// let err = ApiError::Http {
///     status: StatusCode::BAD_REQUEST,
///     message: "Field 'name' is required".to_string(),
/// };
/// assert!(!err.is_transient());
/// assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The client configuration is incomplete or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The server answered with a non-success status code.
    ///
    /// `message` is the human readable description extracted from the
    /// Octane error body, or the raw body when it could not be parsed.
    #[error("API error ({status}): {message}")]
    Http { status: StatusCode, message: String },

    /// Transport failure: DNS, TLS, connection reset, timeout.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body could not be decoded as JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded, but not into an entity or a list of entities.
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A logical entity type name that is not part of the catalog.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),
}

impl ApiError {
    /// Returns the HTTP status for [`ApiError::Http`] errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the failure is worth retrying.
    ///
    /// Only network level timeouts and connection resets qualify. Anything
    /// the server actually answered, including 5xx responses, is final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(err) => err.is_timeout() || is_transient_io(err),
            _ => false,
        }
    }
}

/// Walks an error's source chain looking for a timed out or reset socket.
pub fn is_transient_io(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::ConnectionReset
            ) {
                return true;
            }
        }
        current = err.source();
    }
    false
}

/// Parses an Octane error response and extracts a user-friendly message.
///
/// Octane reports single errors as:
/// ```json
/// {"error_code": "platform.entity_not_found", "description": "..."}
/// ```
///
/// Bulk operations report per-entity errors as:
/// ```json
/// {"errors": [{"error_code": "...", "description": "..."}]}
/// ```
///
/// If neither shape matches, the raw body is kept as the message.
pub fn format_api_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("description")
                .and_then(|d| d.as_str())
                .or_else(|| {
                    json.get("errors")
                        .and_then(|e| e.as_array())
                        .and_then(|arr| arr.first())
                        .and_then(|e| e.get("description"))
                        .and_then(|d| d.as_str())
                })
                .or_else(|| json.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    ApiError::Http { status, message }
}

/// The `{"data": ...}` wrapper Octane uses for request and response bodies.
///
/// Writes always send a list, even for a single entity.
///
/// ```rust
/// use octane_cli::api::DataEnvelope;
///
/// let body = DataEnvelope::new(vec![1, 2]);
/// assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"data":[1,2]}"#);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_api_error_description() {
        let body = r#"{"error_code":"platform.entity_not_found","description":"Entity not found"}"#;
        let err = format_api_error(StatusCode::NOT_FOUND, body);
        assert_eq!(err.to_string(), "API error (404 Not Found): Entity not found");
    }

    #[test]
    fn test_format_api_error_bulk_errors() {
        let body = r#"{"errors":[{"description":"name is required"}],"total_count":0}"#;
        let err = format_api_error(StatusCode::CONFLICT, body);
        assert!(err.to_string().ends_with("name is required"));
    }

    #[test]
    fn test_format_api_error_raw_body() {
        let err = format_api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().ends_with("upstream down"));
    }

    #[test]
    fn test_is_transient_io() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(is_transient_io(&reset));

        let timed_out = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        assert!(is_transient_io(&timed_out));

        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert!(!is_transient_io(&refused));
    }

    #[test]
    fn test_is_transient_io_nested() {
        #[derive(Debug, thiserror::Error)]
        #[error("request failed")]
        struct Wrapper(#[source] io::Error);

        let err = Wrapper(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
        assert!(is_transient_io(&err));
    }

    #[test]
    fn test_http_errors_are_not_transient() {
        let err = ApiError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "busy".to_string(),
        };
        assert!(!err.is_transient());
    }
}
