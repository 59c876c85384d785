// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Environment variable naming the config file (without extension)
pub const CONFIG_PATH_ENV: &str = "BOOK_API_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "BOOK_API";

impl Config {
    /// Load configuration from `$BOOK_API_CONFIG`, or "config.toml" when unset
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from specified file path (extension optional).
    ///
    /// Layers, lowest priority first: defaults, the file if it exists, then
    /// `BOOK_API__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.backlog", 128)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("books.seed", true)?
            .set_default("books.validate_updates", false)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    // Tests that read or set BOOK_API__* variables run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{name}_{}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let _guard = env_lock();
        let cfg = Config::load_from("/nonexistent/book_api_config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.server.backlog, 128);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.performance.max_connections, None);
        assert!(cfg.books.seed);
        assert!(!cfg.books.validate_updates);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _guard = env_lock();
        let path = write_config(
            "book_api_cfg",
            r#"
[server]
port = 8081
workers = 2

[logging]
level = "debug"
access_log_format = "json"

[books]
seed = false
validate_updates = true
"#,
        );
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.logging.access_log_format, "json");
        assert!(!cfg.books.seed);
        assert!(cfg.books.validate_updates);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_socket_addr() {
        let _guard = env_lock();
        let mut cfg = Config::load_from("/nonexistent/book_api_config").unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:3000".parse().unwrap()
        );
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = env_lock();
        let path = write_config(
            "book_api_env_cfg",
            r#"
[server]
port = 8081

[books]
validate_updates = false
"#,
        );
        std::env::set_var("BOOK_API__SERVER__PORT", "9090");
        std::env::set_var("BOOK_API__BOOKS__VALIDATE_UPDATES", "true");

        let loaded = Config::load_from(path.to_str().unwrap());

        std::env::remove_var("BOOK_API__SERVER__PORT");
        std::env::remove_var("BOOK_API__BOOKS__VALIDATE_UPDATES");
        let _ = std::fs::remove_file(path);

        let cfg = loaded.unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert!(cfg.books.validate_updates);
        assert_eq!(cfg.server.host, "127.0.0.1");
    }
}
