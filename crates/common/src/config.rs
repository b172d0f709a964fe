//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Identity provider configuration.
    pub identity: IdentityConfig,
    /// Media storage configuration.
    pub media: MediaConfig,
    /// Channel policy configuration.
    #[serde(default)]
    pub channels: ChannelConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Identity provider configuration.
///
/// The provider is an opaque boundary: a bearer token goes in, profile claims
/// come out. Only the verification endpoint is configured here.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Token verification endpoint URL.
    pub verify_url: String,
    /// Expected audience claim, if the provider returns one.
    #[serde(default)]
    pub audience: Option<String>,
}

/// Media storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Base path for stored files.
    #[serde(default = "default_media_path")]
    pub base_path: String,
    /// Base URL for serving files.
    #[serde(default = "default_media_url")]
    pub base_url: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

/// Channel policy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelConfig {
    /// When true, each user may own at most one channel.
    #[serde(default)]
    pub single_per_owner: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_media_path() -> String {
    "./media".to_string()
}

fn default_media_url() -> String {
    "/media".to_string()
}

const fn default_max_upload_size() -> u64 {
    // 200MB, matching the upload limit enforced at the HTTP layer
    200 * 1024 * 1024
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `CLIPSTREAM_ENV`)
    /// 3. Environment variables with `CLIPSTREAM_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("CLIPSTREAM_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CLIPSTREAM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("CLIPSTREAM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
