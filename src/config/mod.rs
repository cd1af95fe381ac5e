// Configuration module entry point
// Loads configuration from file and environment, and holds shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    ComboConfig, Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig,
    ServerConfig,
};

/// Config file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_FILE: &str = "combo";

/// Environment variable prefix, e.g. `COMBO_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "COMBO";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// A missing file is not an error: defaults and environment still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("combo.path", "/combo")?
            .set_default("combo.base_path", "./yui")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "combo-server")?
            .set_default("http.enable_cors", false)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
