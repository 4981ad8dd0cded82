//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: request logging, static path matching, dispatching.

use crate::config::AppState;
use crate::handler::endpoints::{self, HandlerContext};
use crate::http;
use crate::middleware::{log_requests, ClientAddr};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    peer: Option<SocketAddr>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let state_ref = state.as_ref();
    let response = log_requests(req, peer, &state.logger, move |req| async move {
        route_request(&req, state_ref)
    })
    .await;
    Ok(response)
}

/// Route request by method and exact path
fn route_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let path = req.uri().path();

    let ctx = HandlerContext {
        method: method.as_str(),
        ip: req
            .extensions()
            .get::<ClientAddr>()
            .map_or("unknown", |addr| addr.0.as_str()),
    };

    // HEAD shares the GET routes; hyper drops the body on the wire
    if method == Method::GET || method == Method::HEAD {
        match path {
            "/" => return endpoints::root(&ctx, &state.logger),
            "/500" => return endpoints::simulated_error(&ctx, &state.logger),
            "/health" => return endpoints::health(&ctx, state),
            _ => {}
        }
    }

    http::build_404_response(method.as_str(), path)
}
