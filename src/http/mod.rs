//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the combo
//! business logic.

pub mod cache;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use response::{
    build_404_response, build_405_response, build_health_response, build_options_response,
    build_script_response,
};
