//! API gateway userinfo extraction
//!
//! The gateway in front of the service validates the caller's JWT and forwards
//! its claims as a URL-safe base64 JSON object in `X-Apigateway-Api-Userinfo`.
//! Padding may or may not be present.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::error::ApiError;

/// Header carrying the forwarded JWT claims
pub const USERINFO_HEADER: &str = "x-apigateway-api-userinfo";

/// Reasons a userinfo header is rejected
#[derive(Debug, Error)]
pub enum UserinfoError {
    #[error("missing {USERINFO_HEADER} header")]
    Missing,

    #[error("userinfo header is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("userinfo payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("userinfo payload is not a JSON object")]
    NotAnObject,
}

impl From<UserinfoError> for ApiError {
    fn from(err: UserinfoError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// The authenticated caller's JWT claims
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    claims: Map<String, Value>,
}

impl AuthenticatedUser {
    /// Decode a raw header value
    pub fn decode(header: &str) -> Result<Self, UserinfoError> {
        let encoded = header.trim().trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD.decode(encoded)?;

        match serde_json::from_slice(&bytes)? {
            Value::Object(claims) => Ok(Self { claims }),
            _ => Err(UserinfoError::NotAnObject),
        }
    }

    pub const fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// The `sub` claim
    pub fn subject(&self) -> Option<&str> {
        self.claim_str("sub")
    }

    pub fn email(&self) -> Option<&str> {
        self.claim_str("email")
    }

    fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USERINFO_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(UserinfoError::Missing)?;

        let user = Self::decode(header)?;
        debug!(subject = user.subject().unwrap_or("unknown"), "Authenticated caller");
        Ok(user)
    }
}
