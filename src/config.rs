//! Configuration management for the librarian console

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Where the library backend lives. `base_url` is validated when the RPC
/// client is built, not here, so a missing value is reported with a hint.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TemplatesConfig {
    /// Glob of the tera templates, e.g. `templates/**/*.html`
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub secure_cookie: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBRARIAN_SERVER__PORT=9000, LIBRARIAN_BACKEND__TIMEOUT_SECS=5, ...
            .add_source(
                Environment::with_prefix("LIBRARIAN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.base_url", env::var("LIBRARY_BACKEND_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: "templates/**/*.html".to_string(),
        }
    }
}
