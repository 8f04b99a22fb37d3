//! Transport-level error types.

use thiserror::Error;

/// A failure surfaced by the transport layer.
///
/// `Status` means the server answered with a non-2xx code (optionally with
/// a message extracted from the response body); every other variant means
/// no usable response arrived.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("cancelled")]
    Cancelled,

    #[error("unexpected response shape: {0}")]
    Contract(String),

    #[error("HTTP {status}")]
    Status { status: u16, message: Option<String> },
}

impl TransportError {
    /// Returns the HTTP status code, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Network(format!("connection failed: {error}"))
        } else if error.is_decode() {
            TransportError::Contract(error.to_string())
        } else {
            TransportError::Network(error.to_string())
        }
    }
}

/// The session is no longer valid.
///
/// Deliberately not part of the classified failure taxonomy: the caller
/// must force re-authentication rather than show a transfer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("authentication expired; sign in again")]
pub struct AuthExpired;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accessor() {
        let err = TransportError::Status {
            status: 503,
            message: None,
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(TransportError::Timeout.status(), None);
    }

    #[test]
    fn display_strings() {
        assert_eq!(TransportError::Cancelled.to_string(), "cancelled");
        let err = TransportError::Status {
            status: 404,
            message: Some("not here".into()),
        };
        assert_eq!(err.to_string(), "HTTP 404");
    }
}
