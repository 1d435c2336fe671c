//! Client address extraction for per-client rate limiting.

use axum::extract::ConnectInfo;
use axum::http::{Extensions, HeaderMap};
use std::net::{IpAddr, SocketAddr};

/// Where the client's address is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientIpSource {
    /// Socket peer address from `ConnectInfo`.
    #[default]
    PeerAddr,
    /// `X-Forwarded-For` (first hop), then `X-Real-IP`, then the peer address.
    /// Only safe behind a trusted reverse proxy that overwrites these headers.
    ProxyHeaders,
}

impl ClientIpSource {
    pub fn from_behind_proxy(behind_proxy: bool) -> Self {
        if behind_proxy {
            Self::ProxyHeaders
        } else {
            Self::PeerAddr
        }
    }

    /// Resolves the client address for a request, if one can be determined.
    pub fn resolve(self, headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
        if self == Self::ProxyHeaders {
            if let Some(ip) = forwarded_for(headers).or_else(|| real_ip(headers)) {
                return Some(ip);
            }
        }

        extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .and_then(|s| s.trim().parse().ok())
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers.get("x-real-ip")?.to_str().ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer(addr: &str) -> Extensions {
        let mut ext = Extensions::new();
        ext.insert(ConnectInfo(addr.parse::<SocketAddr>().unwrap()));
        ext
    }

    #[test]
    fn test_peer_addr_ignores_forwarding_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        let ip = ClientIpSource::PeerAddr.resolve(&headers, &peer("10.0.0.1:5555"));

        assert_eq!(ip, Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_proxy_headers_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.2"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.1"));

        let ip = ClientIpSource::ProxyHeaders.resolve(&headers, &peer("10.0.0.1:5555"));

        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_proxy_headers_falls_back_to_real_ip_then_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.1"));
        let ip = ClientIpSource::ProxyHeaders.resolve(&headers, &peer("10.0.0.1:5555"));
        assert_eq!(ip, Some("198.51.100.1".parse().unwrap()));

        let ip = ClientIpSource::ProxyHeaders.resolve(&HeaderMap::new(), &peer("10.0.0.1:5555"));
        assert_eq!(ip, Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_garbage_forwarded_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));

        let ip = ClientIpSource::ProxyHeaders.resolve(&headers, &peer("[::1]:80"));

        assert_eq!(ip, Some("::1".parse().unwrap()));
    }

    #[test]
    fn test_no_source_available() {
        assert_eq!(
            ClientIpSource::PeerAddr.resolve(&HeaderMap::new(), &Extensions::new()),
            None
        );
    }
}
