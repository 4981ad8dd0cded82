//! HTTP response building module
//!
//! Provides builders for the responses the service emits, decoupled from specific handlers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            log_build_error("JSON", &e);
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from_static(
                    br#"{"message":"Internal Server Error","status":"error"}"#,
                )))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response for an unmatched method/path pair
pub fn build_404_response(method: &str, path: &str) -> Response<Full<Bytes>> {
    let body = format!("Cannot {method} {path}");
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body.clone())))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            let mut resp = Response::new(Full::new(Bytes::from(body)));
            *resp.status_mut() = StatusCode::NOT_FOUND;
            resp
        })
}

/// Report a response build failure on stderr; there is no logger in scope here
fn log_build_error(status: &str, error: &impl std::fmt::Display) {
    eprintln!("[ERROR] Failed to build {status} response: {error}");
}
