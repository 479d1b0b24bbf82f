//! API error handling
//!
//! Provides sanitized error responses that don't leak implementation details.
//! In production mode, internal errors return generic messages without details.

use std::sync::atomic::{AtomicBool, Ordering};

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Global flag to control error detail exposure
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Configure whether internal error details should be exposed in responses.
///
/// Production deployments set this to `false` so upstream URLs and storage
/// paths never reach API callers.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

fn sanitize_error_message(msg: &str) -> String {
    sanitize_with(msg, should_expose_details())
}

/// Strip messages that carry paths, connection strings or upstream URLs
fn sanitize_with(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/Users/",
        "/var/",
        "/etc/",
        "C:\\",
        "sqlite://",
        ".db",
        "stack backtrace",
        "panicked at",
        ".rs:",
        "connection refused",
        "api_key",
        "apikey",
    ];

    let msg_lower = msg.to_lowercase();
    if sensitive_patterns
        .iter()
        .any(|pattern| msg_lower.contains(&pattern.to_lowercase()))
    {
        return GENERIC_MESSAGE.to_string();
    }

    if msg.contains("://") {
        return GENERIC_MESSAGE.to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                sanitize_error_message(msg),
                None,
            ),
            Self::Unauthorized(msg) => {
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Authentication required".to_string()
                };
                (StatusCode::UNAUTHORIZED, "unauthorized", sanitized, None)
            },
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                sanitize_error_message(msg),
                None,
            ),
            Self::Conflict(msg) => (
                StatusCode::CONFLICT,
                "conflict",
                sanitize_error_message(msg),
                None,
            ),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Rate limit exceeded".to_string(),
                None,
            ),
            Self::ServiceUnavailable(msg) => {
                // Upstream errors often quote the upstream URL
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Service temporarily unavailable".to_string()
                };
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    sanitized,
                    None,
                )
            },
            Self::GatewayTimeout(msg) => (
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                sanitize_error_message(msg),
                None,
            ),
            Self::Internal(msg) => {
                let details = should_expose_details().then(|| msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    details,
                )
            },
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::RateLimited => Self::RateLimited,
            ApplicationError::NotAuthorized(msg) => Self::Unauthorized(msg),
            ApplicationError::ExternalService(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::Conflict(msg) => Self::Conflict(msg),
            ApplicationError::Timeout(msg) => Self::GatewayTimeout(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn api_error_messages() {
        assert_eq!(
            ApiError::BadRequest("invalid input".into()).to_string(),
            "Bad request: invalid input"
        );
        assert_eq!(
            ApiError::Conflict("test.com".into()).to_string(),
            "Conflict: test.com"
        );
        assert_eq!(ApiError::RateLimited.to_string(), "Rate limited");
    }

    #[test]
    fn error_response_omits_empty_details() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("code"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn invalid_domain_converts_to_bad_request() {
        let source = ApplicationError::Domain(domain::DomainError::InvalidDomain("x".into()));
        assert!(matches!(ApiError::from(source), ApiError::BadRequest(_)));
    }

    #[test]
    fn upstream_errors_convert() {
        assert!(matches!(
            ApiError::from(ApplicationError::ExternalService("503".into())),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::NotAuthorized("bad key".into())),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::RateLimited),
            ApiError::RateLimited
        ));
    }

    #[test]
    fn store_and_deadline_errors_convert() {
        assert!(matches!(
            ApiError::from(ApplicationError::Conflict("dup".into())),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::Timeout("slow".into())),
            ApiError::GatewayTimeout(_)
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::NotFound("org 1".into())),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn configuration_error_converts_to_internal() {
        let source = ApplicationError::Configuration("missing key".to_string());
        assert!(matches!(ApiError::from(source), ApiError::Internal(_)));
    }

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApiError::GatewayTimeout("x".into()), StatusCode::GATEWAY_TIMEOUT),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn conflict_body_carries_code() {
        let body = body_of(ApiError::Conflict("duplicate".into()).into_response()).await;
        assert_eq!(body.code, "conflict");
    }

    #[test]
    fn sanitize_hides_database_paths_in_production() {
        let sanitized = sanitize_with("unable to open /var/lib/mosaic/mosaic.db", false);
        assert_eq!(sanitized, GENERIC_MESSAGE);
    }

    #[test]
    fn sanitize_hides_upstream_urls_in_production() {
        let sanitized = sanitize_with("request to https://api.affinity.co failed", false);
        assert_eq!(sanitized, GENERIC_MESSAGE);
    }

    #[test]
    fn sanitize_preserves_safe_messages() {
        let sanitized = sanitize_with("Invalid domain: not a domain", false);
        assert_eq!(sanitized, "Invalid domain: not a domain");
    }

    #[test]
    fn sanitize_exposes_details_in_development() {
        let msg = "unable to open /var/lib/mosaic/mosaic.db";
        assert_eq!(sanitize_with(msg, true), msg);
    }
}
