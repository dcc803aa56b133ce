/// CLI configuration
use crate::error::{CliError, Result};
use musicapp_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "musicapp.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_session")]
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) if !path.exists() => {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. MUSICAPP_SERVER__BASE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("MUSICAPP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server.base_url).map_err(|e| {
            CliError::Config(format!("Invalid base URL '{}': {}", self.server.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CliError::Config(format!(
                "Base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.server.timeout_secs == 0 || self.server.connect_timeout_secs == 0 {
            return Err(CliError::Config(
                "Timeouts must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    /// Client settings, with tokens restored from the session file
    pub fn client_config(
        &self,
        access_token: Option<String>,
        refresh_token: Option<String>,
    ) -> ClientConfig {
        let mut config = ClientConfig::new(self.server.base_url.clone()).timeouts(
            Duration::from_secs(self.server.timeout_secs),
            Duration::from_secs(self.server.connect_timeout_secs),
        );
        config.access_token = access_token;
        config.refresh_token = refresh_token;
        config
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
        connect_timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_session() -> SessionSettings {
    SessionSettings {
        path: default_session_path(),
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from("./musicapp-session.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            session: default_session(),
        }
    }
}
