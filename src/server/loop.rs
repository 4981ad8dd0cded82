// Server loop module
// Accepts connections until the process exits

use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;

/// Accept loop. Accept errors are logged and the loop carries on.
///
/// Must run inside a `LocalSet`; connections are served with `spawn_local`.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
            Err(e) => state.logger.error(
                "Failed to accept connection",
                json!({ "error": e.to_string() }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EnvOverrides};
    use crate::logger::Logger;
    use crate::server::create_listener;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_routes_over_tcp() {
        let config = Config::load_with("does-not-exist/hello-service", &EnvOverrides::default())
            .unwrap();
        let state = Arc::new(AppState::new(config, Arc::new(Logger::memory()), Instant::now()));
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                tokio::task::spawn_local(start_server_loop(listener, Arc::clone(&state)));

                let root = get(addr, "/").await;
                assert!(root.starts_with("HTTP/1.1 200 OK"));
                assert!(root.contains("content-type: application/json"));
                assert!(root.contains(r#""message":"Hello World""#));

                let error = get(addr, "/500").await;
                assert!(error.starts_with("HTTP/1.1 500 Internal Server Error"));
                assert!(error.contains(r#""status":"error""#));
            })
            .await;

        let entries = state.logger.entries();
        let completed: Vec<_> = entries
            .iter()
            .filter(|e| e["message"] == "Request completed")
            .collect();
        assert_eq!(completed.len(), 2);
        assert!(completed.iter().all(|e| e["ip"] == "127.0.0.1"));
    }
}
