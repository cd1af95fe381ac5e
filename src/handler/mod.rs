//! Request handler module
//!
//! Responsible for request routing dispatch and the combo endpoint.

pub mod combo;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
