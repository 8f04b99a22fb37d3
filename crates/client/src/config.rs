//! Endpoint and auth-context configuration.
//!
//! Both values are supplied by the application (environment lookup is the
//! caller's concern); this module only normalizes and derives URLs from
//! them.

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};

/// Header carrying the session auth token.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");
/// Header carrying the session identifier.
pub const SESSION_ID_HEADER: HeaderName = HeaderName::from_static("x-session-id");

/// Base URLs of the chat API and the public distribution endpoint.
#[derive(Debug, Clone)]
pub struct Endpoints {
    api_base: String,
    distribution_base: String,
}

impl Endpoints {
    /// Creates endpoint configuration, trimming trailing slashes.
    pub fn new(api_base: impl Into<String>, distribution_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            distribution_base: distribution_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The metadata-registration endpoint for uploads.
    pub fn upload_endpoint(&self) -> String {
        format!("{}/api/files/upload", self.api_base)
    }

    /// The public (unauthenticated) distribution URL for a stored file.
    pub fn distribution_url(&self, filename: &str) -> String {
        format!("{}/chat/{filename}", self.distribution_base)
    }
}

/// Per-call authentication context.
///
/// Both credentials are optional; headers carry them only when both are
/// present, otherwise requests go out with a bare `Accept`.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
    session_id: Option<String>,
}

impl AuthContext {
    pub fn new(token: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            session_id: Some(session_id.into()),
        }
    }

    /// A context with no credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Builds the request headers for an authenticated API call.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));

        if let (Some(token), Some(session_id)) = (&self.token, &self.session_id)
            && let (Ok(token), Ok(session_id)) = (
                HeaderValue::from_str(token),
                HeaderValue::from_str(session_id),
            )
        {
            headers.insert(AUTH_TOKEN_HEADER, token);
            headers.insert(SESSION_ID_HEADER, session_id);
        }

        headers
    }
}
