//! Extraction of the signed URL, form parameters, and signature from a request.
//!
//! The sender signs the URL it called, which is not always the URL this process
//! sees: behind a TLS-terminating proxy the scheme and host differ. Configure a
//! public URL in that case so the signed URL can be rebuilt exactly.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use hookgate_core::DuplicateParamPolicy;

/// Errors raised while extracting verification input from a request.
///
/// These are answered before any signature check runs.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The body is larger than the configured limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The body could not be read from the connection.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// A form parameter name was repeated and the policy rejects duplicates.
    #[error("duplicate form parameter: {0}")]
    DuplicateParam(String),

    /// The request URL cannot be rebuilt: relative URI, no `Host`, and no public URL.
    #[error("cannot determine request URL: missing Host header")]
    MissingHost,
}

impl RequestError {
    /// HTTP status used to answer this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::BodyTooLarge { .. } => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::Body(_) | Self::DuplicateParam(_) | Self::MissingHost => {
                http::StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Rebuild the absolute URL the sender signed.
///
/// Resolution order:
/// 1. `public_url` (trailing `/` trimmed) followed by the request path and query.
/// 2. The request URI itself when it is already absolute (HTTP/2, proxies).
/// 3. `X-Forwarded-Proto` (or `http`) + `Host` header + path and query.
///
/// # Errors
///
/// Returns [`RequestError::MissingHost`] when none of the above applies.
pub fn reconstruct_url(
    parts: &http::request::Parts,
    public_url: Option<&str>,
) -> Result<String, RequestError> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    if let Some(base) = public_url {
        return Ok(format!("{}{path_and_query}", base.trim_end_matches('/')));
    }

    if parts.uri.scheme().is_some() && parts.uri.authority().is_some() {
        return Ok(parts.uri.to_string());
    }

    let host = parts
        .headers
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .ok_or(RequestError::MissingHost)?;

    let scheme = parts
        .headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");

    Ok(format!("{scheme}://{host}{path_and_query}"))
}

/// Whether the request body is a URL-encoded form.
#[must_use]
pub fn is_form_body(parts: &http::request::Parts) -> bool {
    let form = mime::APPLICATION_WWW_FORM_URLENCODED.essence_str();
    parts
        .headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.essence_str() == form)
}

/// Extract the signed parameters from the request body.
///
/// Only URL-encoded form bodies carry parameters; other bodies yield none
/// because the query string is already part of the signed URL.
///
/// # Errors
///
/// Returns [`RequestError::DuplicateParam`] when a name repeats under
/// [`DuplicateParamPolicy::Reject`].
pub fn extract_params(
    parts: &http::request::Parts,
    body: &[u8],
    policy: DuplicateParamPolicy,
) -> Result<BTreeMap<String, String>, RequestError> {
    if !is_form_body(parts) {
        return Ok(BTreeMap::new());
    }
    parse_form_params(body, policy)
}

/// Decode a URL-encoded form body into a name to value map under `policy`.
///
/// # Errors
///
/// Returns [`RequestError::DuplicateParam`] when a name repeats under
/// [`DuplicateParamPolicy::Reject`].
pub fn parse_form_params(
    body: &[u8],
    policy: DuplicateParamPolicy,
) -> Result<BTreeMap<String, String>, RequestError> {
    let mut params = BTreeMap::new();
    for (name, value) in form_urlencoded::parse(body) {
        match params.entry(name.into_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
            Entry::Occupied(mut slot) => match policy {
                DuplicateParamPolicy::Reject => {
                    return Err(RequestError::DuplicateParam(slot.key().clone()));
                }
                DuplicateParamPolicy::FirstWins => {}
                DuplicateParamPolicy::LastWins => {
                    slot.insert(value.into_owned());
                }
            },
        }
    }
    Ok(params)
}

/// Read the signature header.
///
/// Returns `None` when the header is absent. A value that is not valid UTF-8 is
/// decoded lossily, so it still reaches verification and fails as malformed.
#[must_use]
pub fn signature_header<'a>(
    parts: &'a http::request::Parts,
    name: &http::HeaderName,
) -> Option<Cow<'a, str>> {
    parts
        .headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
}
