//! Global fixed-window rate limiting middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    domain::entities::Principal, error::AppError, state::AppState, utils::ClientIpSource,
};

/// Key used when no client address can be determined.
///
/// All such requests share one bucket, so a single unresolvable caller can
/// exhaust the quota for every other unresolvable caller.
const UNKNOWN_CLIENT: &str = "unknown";

/// Admits or rejects the request against the shared [`RateLimiter`].
///
/// # Limits
///
/// `RATE_LIMIT_REQUESTS` per `RATE_LIMIT_WINDOW_SECONDS` per client
/// (defaults: 100 per 60s). Requests exceeding the limit receive
/// `429 Too Many Requests` and do not count against the window.
///
/// # Key Extraction
///
/// The principal's uid when the request already carries one, otherwise the
/// client address resolved per [`ClientIpSource`]. Mounted globally ahead of
/// the per-route auth layers, so in practice the key is the client address.
///
/// [`RateLimiter`]: crate::domain::rate_limiter::RateLimiter
pub async fn layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_id = client_key(state.client_ip, &req);

    if !state.rate_limiter.admit(&client_id) {
        tracing::warn!(client_id = %client_id, "Rate limit exceeded");
        metrics::counter!("http_rate_limited_total").increment(1);
        return Err(AppError::RateLimited);
    }

    Ok(next.run(req).await)
}

/// Identifies the client a request is counted against.
pub fn client_key(source: ClientIpSource, req: &Request) -> String {
    if let Some(principal) = req.extensions().get::<Principal>() {
        return principal.uid.clone();
    }

    source
        .resolve(req.headers(), req.extensions())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| {
            tracing::debug!(
                path = %req.uri().path(),
                "Client address unresolved, counting against shared bucket"
            );
            UNKNOWN_CLIENT.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::ConnectInfo};
    use serde_json::Map;
    use std::net::SocketAddr;

    fn request() -> Request {
        let mut req = Request::builder()
            .uri("/")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo("10.0.0.1:4000".parse::<SocketAddr>().unwrap()));
        req
    }

    #[test]
    fn test_client_key_uses_peer_address() {
        assert_eq!(client_key(ClientIpSource::PeerAddr, &request()), "10.0.0.1");
    }

    #[test]
    fn test_client_key_uses_proxy_headers_when_trusted() {
        assert_eq!(
            client_key(ClientIpSource::ProxyHeaders, &request()),
            "203.0.113.7"
        );
    }

    #[test]
    fn test_client_key_prefers_principal() {
        let mut req = request();
        req.extensions_mut().insert(Principal::new("u1", Map::new()));

        assert_eq!(client_key(ClientIpSource::PeerAddr, &req), "u1");
    }

    #[test]
    fn test_client_key_unknown() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_key(ClientIpSource::PeerAddr, &req), UNKNOWN_CLIENT);
    }
}
