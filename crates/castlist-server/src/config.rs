//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, database path,
//! session secret, and the completion endpoint.

use castlist_extractor::ExtractorConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database path (":memory:" for ephemeral)
    pub database_path: String,

    /// Secret for signing session tokens
    pub session_secret: String,

    /// Token expiry in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,

    /// Completion endpoint settings
    pub openai: OpenAiConfig,

    /// Extraction pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Completion endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Bearer token for the API
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
}

/// Default token expiry: 1 hour
fn default_token_expiry() -> u64 {
    3600
}

fn default_openai_endpoint() -> String {
    castlist_llm::openai::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    "gpt-5".to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;

        // Validate required fields
        if config.session_secret.is_empty() {
            return Err(ConfigError::MissingField("session_secret".to_string()));
        }
        if config.openai.api_key.is_empty() {
            return Err(ConfigError::MissingField("openai.api_key".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            session_secret: "test-secret-key-do-not-use-in-production".to_string(),
            token_expiry_secs: 3600,
            openai: OpenAiConfig {
                endpoint: default_openai_endpoint(),
                api_key: "test-key".to_string(),
                model: default_model(),
            },
            extractor: ExtractorConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
