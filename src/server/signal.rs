// Signal handling module
//
// Supported signals:
// - SIGTERM: log and exit(0)
// - SIGINT:  log and exit(0) (Ctrl+C)
//
// Exit is immediate: in-flight requests are not drained.

use serde_json::json;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger::Logger;

/// Write the single shutdown entry for `signal`
pub fn log_shutdown(logger: &Logger, signal: &str) {
    logger.info(
        &format!("{signal} received, shutting down gracefully"),
        json!({
            "signal": signal,
            "pid": std::process::id(),
        }),
    );
}

fn shutdown(state: &AppState, signal: &str) -> ! {
    log_shutdown(&state.logger, signal);
    std::process::exit(0);
}

/// Start signal handlers (Unix only)
///
/// Both signals are registered before this returns, so a signal sent any
/// time afterwards is handled here rather than by the default action.
/// A background task then waits for the first one, logs it and exits.
/// Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => shutdown(&state, "SIGTERM"),
            _ = sigint.recv() => shutdown(&state, "SIGINT"),
        };
    });

    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            shutdown(&state, "SIGINT");
        }
    });
    Ok(())
}
