//! Request handler module
//!
//! Responsible for request routing dispatch and the static route handlers.

pub mod endpoints;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
