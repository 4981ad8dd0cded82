//! HTTP protocol layer module
//!
//! Response builders shared by the route handlers.

pub mod response;

// Re-export commonly used types
pub use response::{build_404_response, json_response};
