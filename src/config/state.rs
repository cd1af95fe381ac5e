// Application state module
// Holds the loaded configuration shared by every connection

use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Base directory scripts are resolved against
    pub base_path: PathBuf,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let base_path = PathBuf::from(&config.combo.base_path);
        Self { config, base_path }
    }

    /// Readiness: the script directory must be reachable
    pub fn is_ready(&self) -> bool {
        self.base_path.is_dir()
    }
}
