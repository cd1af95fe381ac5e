//! Combo module
//!
//! Serves several script files as one response: the query string names the
//! scripts, each one is validated against the base directory, and the bytes
//! of the survivors are concatenated in request order.

pub mod error;
pub mod query;
pub mod render;
pub mod validate;

use std::path::{Path, PathBuf};

pub use error::Rejection;
pub use query::{generate_query_string, parse};
pub use render::{render_combo, CONTENT_TYPE};
pub use validate::{
    select_scripts, ComboSelection, ResolvedScript, StatusHint, REQUIRE_VERSIONS_FILE,
};

/// Script identifiers requested in one HTTP request
#[derive(Debug, Clone)]
pub struct ComboRequest {
    scripts: Vec<String>,
    base_path: PathBuf,
}

impl ComboRequest {
    pub fn new(scripts: Vec<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            scripts,
            base_path: base_path.into(),
        }
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Check every identifier against the filesystem
    pub fn validate(&self) -> ComboSelection {
        select_scripts(&self.scripts[..], &self.base_path)
    }
}
