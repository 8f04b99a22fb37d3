//! Transport seam between orchestration and the wire.
//!
//! Orchestration code talks to a [`Transport`] trait so the flow stays
//! testable with mocks; [`HttpTransport`] is the `reqwest` implementation
//! used in production. No timeout is configured here — timeouts surface
//! from the transport layer and are classified by the caller.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::AuthContext;
use crate::error::TransportError;
use crate::types::{ErrorBody, FetchedObject, RegisterUploadRequest, RegisterUploadResponse};

/// Chunk size for the streaming `PUT` body. Each yielded chunk reports
/// cumulative progress through the transfer's progress channel.
const PUT_CHUNK_SIZE: usize = 64 * 1024;

/// Abstract wire operations used by the transfer client.
///
/// Implementations clone what they need from the borrowed arguments before
/// entering the returned future.
pub trait Transport: Send + Sync {
    /// Registers upload metadata and returns the typed response carrying
    /// the pre-authorized storage target.
    fn register_upload(
        &self,
        url: &str,
        request: &RegisterUploadRequest,
        auth: &AuthContext,
    ) -> Pin<Box<dyn Future<Output = Result<RegisterUploadResponse, TransportError>> + Send + '_>>;

    /// Streams `content` to the storage target via `PUT`.
    ///
    /// Cumulative sent-byte counts are reported through `progress_tx`
    /// (non-blocking; drops are acceptable). Cancelling `cancel` aborts the
    /// request and resolves to [`TransportError::Cancelled`].
    fn put_object(
        &self,
        url: &str,
        content_type: &str,
        content: Bytes,
        cancel: CancellationToken,
        progress_tx: mpsc::Sender<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + '_>>;

    /// Fetches an object from the distribution endpoint, unauthenticated.
    fn fetch_object(
        &self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedObject, TransportError>> + Send + '_>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    fn register_upload(
        &self,
        url: &str,
        request: &RegisterUploadRequest,
        auth: &AuthContext,
    ) -> Pin<Box<dyn Future<Output = Result<RegisterUploadResponse, TransportError>> + Send + '_>>
    {
        let client = self.client.clone();
        let url = url.to_string();
        let request = request.clone();
        let headers = auth.headers();

        Box::pin(async move {
            let response = client
                .post(&url)
                .headers(headers)
                .json(&request)
                .send()
                .await
                .map_err(TransportError::from)?;

            let status = response.status();
            if !status.is_success() {
                return Err(status_error(response).await);
            }

            response
                .json::<RegisterUploadResponse>()
                .await
                .map_err(|e| TransportError::Contract(e.to_string()))
        })
    }

    fn put_object(
        &self,
        url: &str,
        content_type: &str,
        content: Bytes,
        cancel: CancellationToken,
        progress_tx: mpsc::Sender<u64>,
    ) -> Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + '_>> {
        let client = self.client.clone();
        let url = url.to_string();
        let content_type = content_type.to_string();

        Box::pin(async move {
            let total = content.len() as u64;
            let body = reqwest::Body::wrap_stream(progress_stream(content, progress_tx));

            let request = client
                .put(&url)
                .header(CONTENT_TYPE, content_type)
                .header(CONTENT_LENGTH, total)
                .body(body)
                .send();

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(TransportError::Cancelled);
                }
                result = request => result.map_err(TransportError::from)?,
            };

            let status = response.status();
            if !status.is_success() {
                return Err(status_error(response).await);
            }

            debug!(%url, bytes = total, "object stored");
            Ok(())
        })
    }

    fn fetch_object(
        &self,
        url: &str,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedObject, TransportError>> + Send + '_>> {
        let client = self.client.clone();
        let url = url.to_string();

        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .map_err(TransportError::from)?;

            let status = response.status();
            if !status.is_success() {
                return Err(status_error(response).await);
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("application/octet-stream")
                .to_string();

            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?;

            Ok(FetchedObject {
                bytes,
                content_type,
            })
        })
    }
}

/// Builds a `Status` error from a non-2xx response, probing the body for an
/// optional `{message}` field. The body shape is otherwise not assumed.
async fn status_error(response: reqwest::Response) -> TransportError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    TransportError::Status { status, message }
}

/// Splits `content` into chunks, reporting the cumulative byte count as
/// each chunk is handed to the transport.
fn progress_stream(
    content: Bytes,
    progress_tx: mpsc::Sender<u64>,
) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> + Send {
    stream::unfold(
        (content, 0usize, progress_tx),
        |(content, offset, progress_tx)| async move {
            if offset >= content.len() {
                return None;
            }
            let end = (offset + PUT_CHUNK_SIZE).min(content.len());
            let chunk = content.slice(offset..end);
            let _ = progress_tx.try_send(end as u64);
            Some((Ok(chunk), (content, end, progress_tx)))
        },
    )
}
