//! Server configuration.
//!
//! Loaded from an optional `commandpost.toml` next to the binary, with
//! `COMMANDPOST_`-prefixed environment variables overriding file values
//! (e.g. `COMMANDPOST_PORT=9000`).

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the given file (optional) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be parsed, or when
    /// an override has the wrong type.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder
            .add_source(config::Environment::with_prefix("COMMANDPOST"))
            .build()?
            .try_deserialize()
    }

    /// The socket address string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: ServerConfig = toml::from_str("port = 9000").unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.host, "127.0.0.1");
    }
}
