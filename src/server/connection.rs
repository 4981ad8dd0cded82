// Connection handling module
// Serves HTTP/1.1 on one accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::AppState;
use crate::handler;

/// Serve a single connection in a local task.
///
/// Requests on the connection run to completion; there is no timeout.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    let state = Arc::clone(state);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.server.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                handler::handle_request(req, Some(peer_addr), Arc::clone(&service_state))
            }),
        );

        if let Err(err) = conn.await {
            state.logger.error(
                "Failed to serve connection",
                json!({
                    "error": err.to_string(),
                    "ip": peer_addr.ip().to_canonical().to_string(),
                }),
            );
        }
    });
}
