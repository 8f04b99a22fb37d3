//! Data model and wire types for the transfer client.

use std::path::PathBuf;

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::classify::ErrorKind;

/// Callback invoked with the upload percentage (0–100).
pub type ProgressCallback = Box<dyn Fn(u8) + Send + Sync>;

/// A file the caller wants to upload. Transient: exists only for the
/// duration of one upload call, never persisted.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,
    /// Size in bytes; always equal to `content.len()`.
    pub size: u64,
    pub content: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: content.len() as u64,
            content,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types (backend JSON contract)
// ---------------------------------------------------------------------------

/// Body of the metadata-registration `POST`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadRequest {
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Registration response: the pre-authorized storage target plus the
/// stored-file record the backend created.
///
/// `url` and `file` are required — a response missing either violates the
/// contract and the upload fails fast rather than proceeding with an
/// undefined target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUploadResponse {
    /// Pre-authorized `PUT` target for the raw bytes.
    pub url: String,
    /// Public distribution URL of the stored object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_url: Option<String>,
    /// Lifetime of `url` in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    pub file: StoredFile,
}

/// The backend's record of a stored file.
///
/// Field names follow the backend's JSON (`originalname`, `mimetype`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Server-assigned storage key, e.g. `chat/<uuid>.png`.
    pub filename: String,
    #[serde(rename = "originalname")]
    pub original_name: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub size: u64,
    #[serde(
        default,
        rename = "uploadDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_date: Option<NaiveDateTime>,
}

/// Optional error body on non-2xx responses. Only `message` is probed;
/// nothing else about the shape is assumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of one upload call.
///
/// Rejections (local policy) and failures (classified transport faults)
/// both carry a user-facing message, so callers need a single branch for
/// "did not succeed"; authentication expiry is deliberately *not* here —
/// it surfaces as [`crate::error::AuthExpired`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Completed {
        file: StoredFile,
        access_url: Option<String>,
    },
    Rejected {
        message: String,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Completed { .. })
    }

    /// The user-facing message for unsuccessful outcomes.
    pub fn message(&self) -> Option<&str> {
        match self {
            TransferOutcome::Completed { .. } => None,
            TransferOutcome::Rejected { message } | TransferOutcome::Failed { message, .. } => {
                Some(message)
            }
        }
    }
}

/// Result of one download call.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// The file was written to disk at `path`.
    Saved { path: PathBuf },
    Failed { kind: ErrorKind, message: String },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Saved { .. })
    }
}

/// Raw bytes fetched from the distribution endpoint, with the declared
/// content type (`application/octet-stream` when absent).
#[derive(Debug, Clone)]
pub struct FetchedObject {
    pub bytes: Bytes,
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_size_tracks_content() {
        let file = CandidateFile::new("a.png", "image/png", vec![0u8; 123]);
        assert_eq!(file.size, 123);
    }

    #[test]
    fn register_request_wire_names() {
        let req = RegisterUploadRequest {
            original_name: "photo.png".into(),
            mime_type: "image/png".into(),
            size: 42,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "originalName": "photo.png",
                "mimeType": "image/png",
                "size": 42,
            })
        );
    }

    #[test]
    fn register_response_requires_url_and_file() {
        let missing_url = serde_json::json!({
            "file": {
                "filename": "chat/x.png",
                "originalname": "x.png",
                "mimetype": "image/png",
                "size": 1,
            }
        });
        assert!(serde_json::from_value::<RegisterUploadResponse>(missing_url).is_err());

        let missing_file = serde_json::json!({ "url": "https://storage/x" });
        assert!(serde_json::from_value::<RegisterUploadResponse>(missing_file).is_err());
    }

    #[test]
    fn stored_file_backend_field_names() {
        let json = serde_json::json!({
            "filename": "chat/abc.png",
            "originalname": "cat.png",
            "mimetype": "image/png",
            "size": 2048,
            "uploadDate": "2026-03-01T09:30:00",
        });
        let file: StoredFile = serde_json::from_value(json).unwrap();
        assert_eq!(file.filename, "chat/abc.png");
        assert_eq!(file.original_name, "cat.png");
        assert!(file.upload_date.is_some());
    }

    #[test]
    fn stored_file_tolerates_missing_upload_date() {
        let json = serde_json::json!({
            "filename": "chat/abc.pdf",
            "originalname": "doc.pdf",
            "mimetype": "application/pdf",
            "size": 99,
        });
        let file: StoredFile = serde_json::from_value(json).unwrap();
        assert!(file.upload_date.is_none());
    }

    #[test]
    fn error_body_is_lenient() {
        let body: ErrorBody = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(body.message.is_none());

        let body: ErrorBody =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("nope"));
    }

    #[test]
    fn outcome_message_accessor() {
        let rejected = TransferOutcome::Rejected {
            message: "too big".into(),
        };
        assert!(!rejected.is_success());
        assert_eq!(rejected.message(), Some("too big"));
    }
}
