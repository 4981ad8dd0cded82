//! Request logging middleware
//!
//! Wraps a handler call: logs `Incoming request` before dispatch and
//! `Request completed` once the handler has produced its final response.
//! Both entries carry the same method, url and client address.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Instant;

use hyper::header::{HeaderMap, USER_AGENT};
use hyper::{Request, Response};
use serde_json::{json, Value};

use crate::logger::Logger;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolved client address, stored in request extensions for handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

/// Request metadata captured on arrival
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    /// Path plus query string, as received
    pub url: String,
    pub client_addr: String,
    pub user_agent: Option<String>,
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub started_at: Instant,
}

impl RequestContext {
    /// Snapshot the request and start the clock
    pub fn capture<B>(req: &Request<B>, peer: Option<SocketAddr>) -> Self {
        let uri = req.uri();
        let headers = req.headers();
        Self {
            method: req.method().to_string(),
            url: uri
                .path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string),
            client_addr: client_address(peer, headers),
            user_agent: header_value(headers, USER_AGENT.as_str()),
            forwarded_for: header_value(headers, X_FORWARDED_FOR),
            real_ip: header_value(headers, X_REAL_IP),
            started_at: Instant::now(),
        }
    }

    fn arrival_fields(&self) -> Value {
        json!({
            "method": self.method,
            "url": self.url,
            "userAgent": self.user_agent,
            "ip": self.client_addr,
            "headers": {
                X_FORWARDED_FOR: self.forwarded_for,
                X_REAL_IP: self.real_ip,
            },
        })
    }

    fn completion_fields(&self, outcome: &ResponseOutcome) -> Value {
        json!({
            "method": self.method,
            "url": self.url,
            "statusCode": outcome.status,
            "duration": format!("{}ms", outcome.duration_ms),
            "ip": self.client_addr,
        })
    }
}

/// Status and timing of a finalized response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub status: u16,
    pub duration_ms: u64,
}

impl ResponseOutcome {
    pub fn observe<B>(resp: &Response<B>, started_at: Instant) -> Self {
        Self {
            status: resp.status().as_u16(),
            duration_ms: u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Resolve the client address
///
/// Prefers the direct peer; without one, falls back to the first
/// `X-Forwarded-For` hop, then `X-Real-IP`. Forwarded values are not validated.
pub fn client_address(peer: Option<SocketAddr>, headers: &HeaderMap) -> String {
    if let Some(addr) = peer {
        return addr.ip().to_canonical().to_string();
    }

    header_value(headers, X_FORWARDED_FOR)
        .and_then(|v| {
            v.split(',')
                .map(str::trim)
                .find(|hop| !hop.is_empty())
                .map(ToString::to_string)
        })
        .or_else(|| header_value(headers, X_REAL_IP).map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Run `next` with arrival and completion logging around it
///
/// The response is returned untouched.
pub async fn log_requests<B, RB, F, Fut>(
    mut req: Request<B>,
    peer: Option<SocketAddr>,
    logger: &Logger,
    next: F,
) -> Response<RB>
where
    F: FnOnce(Request<B>) -> Fut,
    Fut: Future<Output = Response<RB>>,
{
    let ctx = RequestContext::capture(&req, peer);
    logger.info("Incoming request", ctx.arrival_fields());

    req.extensions_mut().insert(ClientAddr(ctx.client_addr.clone()));

    let resp = next(req).await;

    let outcome = ResponseOutcome::observe(&resp, ctx.started_at);
    logger.info("Request completed", ctx.completion_fields(&outcome));

    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::json_response;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::time::Duration;

    fn peer() -> Option<SocketAddr> {
        Some("192.168.1.10:54321".parse().unwrap())
    }

    fn duration_ms(entry: &Value) -> u64 {
        entry["duration"]
            .as_str()
            .and_then(|d| d.strip_suffix("ms"))
            .and_then(|d| d.parse().ok())
            .unwrap()
    }

    #[tokio::test]
    async fn test_two_entries_in_order() {
        let logger = Logger::memory();
        let req = Request::builder()
            .method("GET")
            .uri("/search?q=rust")
            .header("User-Agent", "curl/8.0")
            .body(())
            .unwrap();

        let resp = log_requests(req, peer(), &logger, |_req| async {
            json_response(StatusCode::OK, &json!({"ok": true}))
        })
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);

        let (arrival, completion) = (&entries[0], &entries[1]);
        assert_eq!(arrival["message"], "Incoming request");
        assert_eq!(completion["message"], "Request completed");
        assert_eq!(arrival["method"], "GET");
        assert_eq!(arrival["method"], completion["method"]);
        assert_eq!(arrival["url"], "/search?q=rust");
        assert_eq!(arrival["url"], completion["url"]);
        assert_eq!(arrival["ip"], "192.168.1.10");
        assert_eq!(arrival["ip"], completion["ip"]);
        assert_eq!(arrival["userAgent"], "curl/8.0");
        assert_eq!(arrival["headers"]["x-forwarded-for"], Value::Null);
        assert_eq!(completion["statusCode"], 200);
    }

    fn assert_key_order(line: &str, keys: &[&str]) {
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| line.find(&format!("\"{k}\":")).unwrap_or_else(|| panic!("{k} missing in {line}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "key order in {line}");
    }

    #[tokio::test]
    async fn test_entries_keep_field_order() {
        let logger = Logger::memory();
        let req = Request::builder().uri("/").body(()).unwrap();

        log_requests(req, peer(), &logger, |_req| async {
            json_response(StatusCode::OK, &json!({}))
        })
        .await;

        let lines = logger.lines();
        assert_key_order(
            &lines[0],
            &["timestamp", "level", "message", "method", "url", "userAgent", "ip", "headers"],
        );
        assert_key_order(
            &lines[1],
            &["timestamp", "level", "message", "method", "url", "statusCode", "duration", "ip"],
        );
    }

    #[tokio::test]
    async fn test_completion_records_status_and_duration() {
        let logger = Logger::memory();
        let req = Request::builder().uri("/slow").body(()).unwrap();

        log_requests(req, peer(), &logger, |_req| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            json_response(StatusCode::INTERNAL_SERVER_ERROR, &json!({}))
        })
        .await;

        let entries = logger.entries();
        assert_eq!(entries[1]["statusCode"], 500);
        assert!(duration_ms(&entries[1]) >= 20);
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let logger = Logger::memory();
        let req = Request::builder().uri("/").body(()).unwrap();

        let resp = log_requests(req, peer(), &logger, |_req| async {
            json_response(StatusCode::ACCEPTED, &json!({"value": 7}))
        })
        .await;

        assert_eq!(resp.status(), StatusCode::ACCEPTED);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"value":7}"#);
    }

    #[tokio::test]
    async fn test_client_addr_visible_to_handler() {
        let logger = Logger::memory();
        let req = Request::builder().uri("/").body(()).unwrap();

        let seen = log_requests(req, peer(), &logger, |req| async move {
            let addr = req.extensions().get::<ClientAddr>().cloned();
            let mut resp = Response::new(());
            resp.extensions_mut().insert(addr);
            resp
        })
        .await;

        let addr = seen.extensions().get::<Option<ClientAddr>>().cloned().flatten();
        assert_eq!(addr, Some(ClientAddr("192.168.1.10".to_string())));
    }

    #[test]
    fn test_client_address_prefers_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, "203.0.113.5".parse().unwrap());
        assert_eq!(client_address(peer(), &headers), "192.168.1.10");
    }

    #[test]
    fn test_client_address_ipv4_mapped_peer() {
        let mapped: SocketAddr = "[::ffff:10.0.0.7]:8080".parse().unwrap();
        assert_eq!(client_address(Some(mapped), &HeaderMap::new()), "10.0.0.7");
    }

    #[test]
    fn test_client_address_forwarded_fallbacks() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, "203.0.113.5, 10.0.0.1".parse().unwrap());
        headers.insert(X_REAL_IP, "198.51.100.2".parse().unwrap());
        assert_eq!(client_address(None, &headers), "203.0.113.5");

        headers.remove(X_FORWARDED_FOR);
        assert_eq!(client_address(None, &headers), "198.51.100.2");

        assert_eq!(client_address(None, &HeaderMap::new()), "unknown");
    }
}
