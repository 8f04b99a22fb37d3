//! Maps transport failures to a stable, user-presentable error taxonomy.
//!
//! Classification is pure: it never mutates shared state, and it never
//! retries. [`is_retryable`] is advisory output for the caller's own retry
//! loop.

use crate::error::TransportError;

/// Stable failure categories shown to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    PayloadTooLarge,
    UnsupportedMediaType,
    ServerError,
    ServiceUnavailable,
    Timeout,
    Network,
    Canceled,
    /// The backend answered, but not with the agreed response shape.
    Contract,
    Unknown,
}

/// Which transfer direction produced the failure. Some status codes and
/// the fallback messages are direction-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOp {
    Upload,
    Download,
}

/// A classified failure: stable kind plus a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: ErrorKind,
    pub message: String,
}

/// Classifies a transport failure for presentation.
///
/// Server-supplied messages override the defaults when present; the
/// per-operation generic message is the guaranteed fallback.
pub fn classify(error: &TransportError, op: TransferOp) -> Classified {
    match error {
        TransportError::Timeout => Classified {
            kind: ErrorKind::Timeout,
            message: match op {
                TransferOp::Upload => "the file upload timed out",
                TransferOp::Download => "the file download timed out",
            }
            .to_string(),
        },
        TransportError::Network(_) => Classified {
            kind: ErrorKind::Network,
            message: "could not reach the server; check your network connection".to_string(),
        },
        TransportError::Cancelled => Classified {
            kind: ErrorKind::Canceled,
            message: match op {
                TransferOp::Upload => "the upload was canceled",
                TransferOp::Download => "the download was canceled",
            }
            .to_string(),
        },
        TransportError::Contract(_) => Classified {
            kind: ErrorKind::Contract,
            message: "the server response was not in the expected format".to_string(),
        },
        TransportError::Status { status, message } => {
            let kind = status_kind(*status, op);
            let message = message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| default_message(kind, op).to_string());
            Classified { kind, message }
        }
    }
}

fn status_kind(status: u16, op: TransferOp) -> ErrorKind {
    match status {
        400 => ErrorKind::BadRequest,
        401 => ErrorKind::Unauthorized,
        403 if op == TransferOp::Download => ErrorKind::Forbidden,
        404 if op == TransferOp::Download => ErrorKind::NotFound,
        413 => ErrorKind::PayloadTooLarge,
        415 => ErrorKind::UnsupportedMediaType,
        500 => ErrorKind::ServerError,
        503 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Unknown,
    }
}

fn default_message(kind: ErrorKind, op: TransferOp) -> &'static str {
    match kind {
        ErrorKind::BadRequest => "the request was invalid",
        ErrorKind::Unauthorized => "authentication is required",
        ErrorKind::Forbidden => "you do not have permission to access this file",
        ErrorKind::NotFound => "the file could not be found",
        ErrorKind::PayloadTooLarge => "the file is too large",
        ErrorKind::UnsupportedMediaType => "the file format is not supported",
        ErrorKind::ServerError => "a server error occurred",
        ErrorKind::ServiceUnavailable => "the service is temporarily unavailable",
        _ => match op {
            TransferOp::Upload => "the file upload failed",
            TransferOp::Download => "the file download failed",
        },
    }
}

/// Statuses worth retrying: request timeout, throttling, and transient
/// server-side failures.
const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Whether the caller's retry loop may reasonably try again.
///
/// True for network-class failures (no response at all) and timeouts;
/// false for everything the server deliberately rejected.
pub fn is_retryable(error: &TransportError) -> bool {
    match error {
        TransportError::Network(_) | TransportError::Timeout => true,
        TransportError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
        TransportError::Cancelled | TransportError::Contract(_) => false,
    }
}
