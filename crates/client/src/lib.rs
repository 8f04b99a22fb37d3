//! Client-side file transfer for the chat app.
//!
//! This crate implements the **transfer logic** between the app and the
//! storage backend; it is a library crate with no UI dependencies — the
//! app supplies a [`chatdrop_notify::Notify`] sink and renders progress
//! itself.
//!
//! # Upload pipeline
//!
//! 1. **Validate** — gate the candidate against the acceptance policy
//! 2. **Register** — `POST` the metadata, receive the storage target
//! 3. **Stream** — `PUT` the bytes with progress and cancellation
//! 4. **Settle** — clear the registry entry, return a uniform outcome
//!
//! Downloads fetch from the public distribution endpoint and save to disk.
//! Transport faults are classified into a stable [`ErrorKind`] taxonomy
//! with an advisory [`is_retryable`] judgment; retries themselves are the
//! caller's decision.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod registry;
pub mod transport;
pub mod types;
pub mod urls;

// Re-export primary types for convenience.
pub use classify::{Classified, ErrorKind, TransferOp, classify, is_retryable};
pub use client::FileClient;
pub use config::{AuthContext, Endpoints};
pub use error::{AuthExpired, TransportError};
pub use registry::{TransferHandle, TransferRegistry};
pub use transport::{HttpTransport, Transport};
pub use types::{
    CandidateFile, DownloadOutcome, FetchedObject, ProgressCallback, RegisterUploadRequest,
    RegisterUploadResponse, StoredFile, TransferOutcome,
};
