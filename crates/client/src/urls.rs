//! Computed view/download/preview URLs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::{AuthContext, Endpoints};

/// Query-parameter encoding: everything but unreserved characters.
const QUERY_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URL for viewing or downloading a stored file through the API.
///
/// Returns the empty string for an empty filename.
pub fn file_url(endpoints: &Endpoints, filename: &str, for_preview: bool) -> String {
    if filename.is_empty() {
        return String::new();
    }
    let segment = if for_preview { "view" } else { "download" };
    format!("{}/api/files/{segment}/{filename}", endpoints.api_base())
}

/// Preview URL, optionally carrying the auth token and session id as
/// percent-encoded query parameters.
///
/// Credentials are appended only when `with_auth` is set and both are
/// present; otherwise the bare view URL is returned.
pub fn preview_url(
    endpoints: &Endpoints,
    filename: &str,
    auth: &AuthContext,
    with_auth: bool,
) -> String {
    if filename.is_empty() {
        return String::new();
    }

    let base = format!("{}/api/files/view/{filename}", endpoints.api_base());
    if !with_auth {
        return base;
    }

    let (Some(token), Some(session_id)) = (auth.token(), auth.session_id()) else {
        return base;
    };

    format!(
        "{base}?token={}&sessionId={}",
        utf8_percent_encode(token, QUERY_ENCODE),
        utf8_percent_encode(session_id, QUERY_ENCODE),
    )
}
