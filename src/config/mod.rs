// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig};

impl Config {
    /// Load configuration from the default `config.toml` (optional) plus
    /// `SERVER_`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("storage.data_file", "squirrels.json")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = Config::load_from("does-not-exist").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.access_log_format, "common");
        assert_eq!(config.storage.data_file, "squirrels.json");
        assert!(config.logging.access_log_file.is_none());
    }

    #[test]
    fn default_address_parses() {
        let config = Config::load_from("does-not-exist").unwrap();
        let addr = config.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
