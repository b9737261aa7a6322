//! Request audit middleware
//!
//! Non-exempt requests get a request row before dispatch and a response row
//! once the inner service has produced a status. Every request, exempt or not,
//! is counted in the HTTP metrics.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::trace;

use crate::api::state::AppState;
use crate::domain::is_exempt;
use crate::infrastructure::observability::{record_http_request, UNMATCHED_ROUTE};

pub async fn audit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    if is_exempt(method.as_str(), &path, &state.exemptions) {
        trace!(method = %method, path = %path, "Request exempt from audit logging");

        let start = Instant::now();
        let response = next.run(request).await;
        record_http_request(method.as_str(), &route, response.status().as_u16(), start.elapsed());

        return response;
    }

    let ip = client_ip(
        request.headers(),
        request.extensions().get::<ConnectInfo<SocketAddr>>(),
    );
    let record = state
        .audit
        .open_record(method.as_str(), &path, &ip, Utc::now())
        .await;

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed();
    let status = response.status().as_u16();

    let elapsed_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
    state
        .audit
        .close_record(&record, status, elapsed_ms, Utc::now())
        .await;

    trace!(
        request_id = %record.request_id(),
        method = %method,
        path = %path,
        status,
        elapsed_ms,
        "Request audited"
    );

    record_http_request(method.as_str(), &route, status, elapsed);

    response
}

/// Client address as seen through proxies
///
/// First `X-Forwarded-For` entry, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<&ConnectInfo<SocketAddr>>) -> String {
    headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        headers.insert("x-real-ip", "198.51.100.2".parse().unwrap());

        assert_eq!(client_ip(&headers, None), "203.0.113.7");
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "198.51.100.2".parse().unwrap());

        assert_eq!(client_ip(&headers, None), "198.51.100.2");
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let peer = ConnectInfo(SocketAddr::from(([192, 0, 2, 4], 55000)));

        assert_eq!(client_ip(&HeaderMap::new(), Some(&peer)), "192.0.2.4");
    }

    #[test]
    fn test_client_ip_unknown() {
        assert_eq!(client_ip(&HeaderMap::new(), None), "unknown");
    }
}
