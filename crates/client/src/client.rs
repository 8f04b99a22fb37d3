//! Upload and download orchestration.
//!
//! [`FileClient`] drives the two-phase upload protocol (metadata
//! registration, then a direct `PUT` to the returned storage target) with
//! per-file progress and cancellation, and the fetch-and-save download
//! flow. Transport is abstracted behind the [`Transport`] trait so the flow
//! is testable with mocks; retry is never performed here — callers consult
//! [`crate::classify::is_retryable`] and decide for themselves.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chatdrop_notify::Notify;
use chatdrop_policy::{file_extension, validate};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::classify::{Classified, ErrorKind, TransferOp, classify};
use crate::config::{AuthContext, Endpoints};
use crate::error::{AuthExpired, TransportError};
use crate::registry::TransferRegistry;
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    CandidateFile, DownloadOutcome, ProgressCallback, RegisterUploadRequest, TransferOutcome,
};
use crate::urls;

/// Capacity of the per-upload progress channel. Progress sends are
/// non-blocking; a full channel drops intermediate updates, and the final
/// 100% report is forced after completion.
const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Client for policy-gated uploads and downloads.
///
/// Owns its transfer registry — cancellation state is scoped to the client
/// instance, not process-global.
pub struct FileClient {
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    registry: TransferRegistry,
    notifier: Arc<dyn Notify>,
}

impl FileClient {
    /// Creates a client backed by the production HTTP transport.
    pub fn new(endpoints: Endpoints, notifier: Arc<dyn Notify>) -> Self {
        Self::with_transport(endpoints, Arc::new(HttpTransport::new()), notifier)
    }

    /// Creates a client with an injected transport (tests, instrumentation).
    pub fn with_transport(
        endpoints: Endpoints,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notify>,
    ) -> Self {
        Self {
            endpoints,
            transport,
            registry: TransferRegistry::new(),
            notifier,
        }
    }

    /// Uploads a file, reporting progress as whole percentages (0–100).
    ///
    /// Policy rejections and classified transport failures both come back
    /// as an unsuccessful [`TransferOutcome`]; only an expired session
    /// breaks that uniformity and surfaces as `Err(AuthExpired)`. A second
    /// upload for a name already in flight cancels and replaces the first.
    pub async fn upload(
        &self,
        file: CandidateFile,
        auth: &AuthContext,
        on_progress: Option<ProgressCallback>,
    ) -> Result<TransferOutcome, AuthExpired> {
        if let Err(reason) = validate(&file.name, &file.mime_type, file.size) {
            let message = reason.to_string();
            self.notifier.error(&message);
            warn!(file = %file.name, %message, "upload rejected by policy");
            return Ok(TransferOutcome::Rejected { message });
        }

        let request = RegisterUploadRequest {
            original_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
        };

        debug!(file = %file.name, size = file.size, "registering upload");
        let registration = match self
            .transport
            .register_upload(&self.endpoints.upload_endpoint(), &request, auth)
            .await
        {
            Ok(registration) => registration,
            Err(error) => return self.upload_failed(&file.name, error),
        };

        if registration.url.trim().is_empty() {
            error!(file = %file.name, "registration response carried no storage target");
            return Ok(TransferOutcome::Failed {
                kind: ErrorKind::Contract,
                message: "the server did not provide an upload target".to_string(),
            });
        }

        let handle = self.registry.begin(&file.name);
        let total = file.size;
        let mut reporter = ProgressReporter::new(on_progress, total);
        let (progress_tx, mut progress_rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);

        let mut put = self.transport.put_object(
            &registration.url,
            &file.mime_type,
            file.content.clone(),
            handle.cancellation(),
            progress_tx,
        );

        let result = loop {
            tokio::select! {
                result = &mut put => break result,
                Some(sent) = progress_rx.recv() => reporter.report(sent),
            }
        };

        // Flush progress that raced with completion; nothing is reported
        // once this call returns.
        while let Ok(sent) = progress_rx.try_recv() {
            reporter.report(sent);
        }

        self.registry.finish(&handle);

        match result {
            Ok(()) => {
                reporter.report(total);
                info!(
                    file = %file.name,
                    key = %registration.file.filename,
                    "upload complete"
                );
                Ok(TransferOutcome::Completed {
                    file: registration.file,
                    access_url: registration.access_url,
                })
            }
            Err(error) => self.upload_failed(&file.name, error),
        }
    }

    fn upload_failed(
        &self,
        name: &str,
        error: TransportError,
    ) -> Result<TransferOutcome, AuthExpired> {
        if let TransportError::Status { status: 401, .. } = error {
            warn!(file = %name, "authentication expired during upload");
            return Err(AuthExpired);
        }

        let Classified { kind, message } = classify(&error, TransferOp::Upload);
        if kind == ErrorKind::Canceled {
            info!(file = %name, "upload canceled");
        } else {
            error!(file = %name, ?kind, %message, "upload failed");
        }
        Ok(TransferOutcome::Failed { kind, message })
    }

    /// Downloads a stored file from the public distribution endpoint and
    /// saves it under `dest_dir`.
    ///
    /// No credentials are attached. The save name is `suggested_name` when
    /// given, otherwise a generated identifier keeping the remote
    /// extension. A 401 surfaces as `Err(AuthExpired)` exactly like
    /// uploads.
    pub async fn download(
        &self,
        filename: &str,
        suggested_name: Option<&str>,
        dest_dir: &Path,
    ) -> Result<DownloadOutcome, AuthExpired> {
        let url = self.endpoints.distribution_url(filename);
        debug!(%filename, %url, "fetching file");

        let fetched = match self.transport.fetch_object(&url).await {
            Ok(fetched) => fetched,
            Err(TransportError::Status { status: 401, .. }) => {
                warn!(%filename, "authentication expired during download");
                return Err(AuthExpired);
            }
            Err(error) => {
                let Classified { kind, message } = classify(&error, TransferOp::Download);
                error!(%filename, ?kind, %message, "download failed");
                return Ok(DownloadOutcome::Failed { kind, message });
            }
        };

        let save_name = match suggested_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => generated_name(filename),
        };
        let path = dest_dir.join(&save_name);

        match save_atomic(&path, &fetched.bytes).await {
            Ok(()) => {
                info!(
                    file = %save_name,
                    bytes = fetched.bytes.len(),
                    content_type = %fetched.content_type,
                    "file saved"
                );
                Ok(DownloadOutcome::Saved { path })
            }
            Err(error) => {
                error!(file = %save_name, %error, "failed to save downloaded file");
                Ok(DownloadOutcome::Failed {
                    kind: ErrorKind::Unknown,
                    message: "the downloaded file could not be saved".to_string(),
                })
            }
        }
    }

    /// Cancels the in-flight upload for `name`. Returns whether one existed.
    pub fn cancel_upload(&self, name: &str) -> bool {
        let canceled = self.registry.cancel(name);
        if canceled {
            info!(file = %name, "upload cancellation requested");
        }
        canceled
    }

    /// Cancels every in-flight upload and returns how many were canceled.
    pub fn cancel_all_uploads(&self) -> usize {
        let count = self.registry.cancel_all();
        if count > 0 {
            info!(count, "canceled all in-flight uploads");
        }
        count
    }

    /// Number of uploads currently in flight.
    pub fn active_uploads(&self) -> usize {
        self.registry.len()
    }

    /// View/download URL for a stored file, served through the API.
    pub fn file_url(&self, filename: &str, for_preview: bool) -> String {
        urls::file_url(&self.endpoints, filename, for_preview)
    }

    /// Preview URL, optionally carrying percent-encoded credentials.
    pub fn preview_url(&self, filename: &str, auth: &AuthContext, with_auth: bool) -> String {
        urls::preview_url(&self.endpoints, filename, auth, with_auth)
    }
}

/// Converts cumulative byte counts to whole percentages, deduplicated and
/// monotonically non-decreasing.
struct ProgressReporter {
    callback: Option<ProgressCallback>,
    total: u64,
    last: Option<u8>,
}

impl ProgressReporter {
    fn new(callback: Option<ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            last: None,
        }
    }

    fn report(&mut self, sent: u64) {
        let Some(callback) = &self.callback else {
            return;
        };
        let percent = percent(sent, self.total);
        if self.last.is_none_or(|last| percent > last) {
            self.last = Some(percent);
            callback(percent);
        }
    }
}

fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent * 100 + total / 2) / total) as u8
}

/// Fallback save name: a fresh identifier keeping the remote extension.
fn generated_name(remote_name: &str) -> String {
    format!("{}{}", Uuid::new_v4(), file_extension(remote_name))
}

/// Writes through a transient `.part` neighbor, then renames into place,
/// so a partially written file never sits under the final name.
async fn save_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut part = path.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    tokio::fs::write(&part, data).await?;
    tokio::fs::rename(&part, path).await
}
