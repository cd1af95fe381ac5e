//! Combo asset server
//!
//! Serves several script files as a single HTTP response:
//! `GET /combo?yui/yui-min.3.js&app/main.js` validates every identifier
//! against the configured base directory and returns the concatenated bytes,
//! with far-future cache headers when the scripts are version-stamped.

pub mod combo;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
