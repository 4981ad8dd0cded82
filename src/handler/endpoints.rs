//! Route handlers
//!
//! Each handler logs one entry of its own and answers with a JSON body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::AppState;
use crate::http;
use crate::logger::{self, Logger};

/// Per-request data the handlers report in their own log entry
pub struct HandlerContext<'a> {
    pub method: &'a str,
    pub ip: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub message: &'static str,
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub message: &'static str,
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since process start
    pub uptime: f64,
}

/// `GET /`
pub fn root(ctx: &HandlerContext<'_>, logger: &Logger) -> Response<Full<Bytes>> {
    logger.info(
        "Root endpoint accessed",
        json!({
            "endpoint": "/",
            "method": ctx.method,
            "ip": ctx.ip,
        }),
    );

    http::json_response(
        StatusCode::OK,
        &StatusBody {
            message: "Hello World",
            status: "success",
            timestamp: logger::timestamp(),
        },
    )
}

/// `GET /500`, a static failure response; nothing actually goes wrong
pub fn simulated_error(ctx: &HandlerContext<'_>, logger: &Logger) -> Response<Full<Bytes>> {
    logger.error(
        "Error endpoint accessed",
        json!({
            "endpoint": "/500",
            "method": ctx.method,
            "ip": ctx.ip,
            "simulatedError": true,
        }),
    );

    http::json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &StatusBody {
            message: "Internal Server Error",
            status: "error",
            timestamp: logger::timestamp(),
        },
    )
}

/// `GET /health`
pub fn health(ctx: &HandlerContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let uptime = state.uptime_secs();

    state.logger.info(
        "Health check accessed",
        json!({
            "endpoint": "/health",
            "method": ctx.method,
            "ip": ctx.ip,
            "uptime": format!("{uptime}s"),
            "memoryUsage": memory_usage(),
        }),
    );

    http::json_response(
        StatusCode::OK,
        &HealthBody {
            message: "Healthy",
            status: "ok",
            timestamp: logger::timestamp(),
            uptime,
        },
    )
}

fn memory_usage() -> Value {
    json!({ "rss": resident_set_bytes() })
}

/// Resident set size of this process, from `/proc/self/status`
#[cfg(target_os = "linux")]
fn resident_set_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

#[cfg(not(target_os = "linux"))]
const fn resident_set_bytes() -> Option<u64> {
    None
}

/// Parse the `VmRSS:   1234 kB` line into bytes
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line
        .trim_start_matches("VmRSS:")
        .split_whitespace()
        .next()?
        .parse()
        .ok()?;
    kb.checked_mul(1024)
}
