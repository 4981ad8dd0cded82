//! Middleware module
//!
//! Layers that wrap route dispatch without touching responses.

pub mod request_logger;

pub use request_logger::{log_requests, ClientAddr};
