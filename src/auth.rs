use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::Error;
use crate::utils::header_utils::extract_bearer_token;

/// The single shared secret a proxy instance accepts.
#[derive(Clone)]
pub struct BearerToken {
    expected: Arc<str>,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            expected: Arc::from(token.into()),
        }
    }

    /// Compare a presented token against the expected one in constant time
    ///
    /// Length differences are rejected up front; for equal lengths the
    /// comparison touches every byte regardless of where a mismatch sits.
    pub fn verify(&self, presented: &str) -> bool {
        presented
            .as_bytes()
            .ct_eq(self.expected.as_bytes())
            .into()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("expected", &"<redacted>")
            .finish()
    }
}

/// Middleware guarding the `/v1` routes
///
/// A missing header, a non-bearer scheme and a wrong token all produce the
/// same 401 so callers cannot tell which check failed.
pub async fn auth_middleware(
    State(token): State<BearerToken>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    match extract_bearer_token(&headers) {
        Some(presented) if token.verify(presented) => next.run(request).await,
        _ => {
            tracing::debug!("Rejected unauthenticated request to {}", request.uri().path());
            Error::Unauthorized.into_response()
        }
    }
}
