use std::sync::Arc;
use std::time::Instant;

mod config;
mod function;
mod handler;
mod http;
mod logger;
mod middleware;
mod server;

/// Usage:
///   hello-service [config-path]   run the HTTP service
///   hello-service invoke          run the function handler on an event read from stdin
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reference point for /health uptime
    let started_at = Instant::now();

    match std::env::args().nth(1).as_deref() {
        Some("invoke") => function::invoke_from_stdin(),
        config_path => {
            let cfg =
                config::Config::load_from(config_path.unwrap_or(config::DEFAULT_CONFIG_PATH))?;

            // Single-threaded runtime; connections are local tasks
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;

            runtime.block_on(async_main(cfg, started_at))
        }
    }
}

async fn async_main(
    cfg: config::Config,
    started_at: Instant,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let logger = Arc::new(logger::Logger::from_config(&cfg.logging)?);
    let listener = server::create_listener(addr)?;
    let port = listener.local_addr()?.port();

    let state = Arc::new(config::AppState::new(cfg, logger, started_at));

    // Handlers go in before the startup entry announces the process
    server::start_signal_handler(Arc::clone(&state))?;
    logger::log_server_start(&state.logger, port, &state.config);

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state))
        .await;

    Ok(())
}
