//! Fixed responses produced by the service itself.
//!
//! Every verification failure maps to the same [`rejection_response`], whatever
//! the reason, so a caller cannot tell a missing header from a wrong key.

use crate::body::WebhookBody;
use crate::request::RequestError;

/// Body sent with every rejected signature.
pub const REJECTION_BODY: &str = "webhook signature rejected";

/// Uniform response for any verification failure.
#[must_use]
pub fn rejection_response() -> http::Response<WebhookBody> {
    text_response(http::StatusCode::FORBIDDEN, REJECTION_BODY)
}

/// Response for a request that could not be turned into verification input.
#[must_use]
pub fn request_error_response(err: &RequestError) -> http::Response<WebhookBody> {
    let status = err.status_code();
    text_response(status, status.canonical_reason().unwrap_or("error"))
}

/// Produce a health check response.
#[must_use]
pub fn health_check_response() -> http::Response<WebhookBody> {
    let mut response = http::Response::new(WebhookBody::from_string(
        r#"{"status":"running","service":"hookgate"}"#,
    ));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

fn text_response(status: http::StatusCode, message: &str) -> http::Response<WebhookBody> {
    let mut response = http::Response::new(WebhookBody::from_string(message));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reject_with_forbidden() {
        let resp = rejection_response();
        assert_eq!(resp.status(), http::StatusCode::FORBIDDEN);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/plain; charset=utf-8"),
        );
    }

    #[test]
    fn test_should_map_request_errors_to_status() {
        let resp = request_error_response(&RequestError::MissingHost);
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);

        let resp = request_error_response(&RequestError::BodyTooLarge { limit: 1 });
        assert_eq!(resp.status(), http::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_should_produce_health_check_response() {
        let resp = health_check_response();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
    }
}
