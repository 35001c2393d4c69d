use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap};
use std::net::{IpAddr, SocketAddr};

/// Extract the bearer token from an `Authorization` header
///
/// Only the exact `Bearer ` scheme prefix is accepted; any other value
/// (or a missing header) yields `None`.
///
/// # Examples
///
/// ```
/// use axum::http::HeaderMap;
/// use plsdescribe::utils::header_utils::extract_bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("authorization", "Bearer my-secret".parse().unwrap());
/// assert_eq!(extract_bearer_token(&headers), Some("my-secret"));
/// ```
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Best-effort client address: first `X-Forwarded-For` hop, then the socket peer
pub fn extract_client_ip(req: &Request) -> Option<IpAddr> {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok());

    forwarded.or_else(|| {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    })
}
