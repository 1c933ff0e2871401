//! Configuration management
//!
//! Loads configuration from `config.yml` with `MENTORBRIDGE_*` environment
//! variable overrides. Missing optional values fall back to sensible
//! defaults, so a fresh checkout runs with no config file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Auth configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/mentorbridge.db".to_string()
}

/// Auth configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric secret used to sign bearer tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Token lifetime in days
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_expiry_days: default_token_expiry_days(),
        }
    }
}

fn default_token_secret() -> String {
    // Development fallback; deployments override via
    // MENTORBRIDGE_AUTH_TOKEN_SECRET
    "change-me-in-production".to_string()
}

fn default_token_expiry_days() -> i64 {
    7
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Root upload directory (avatars land in `<path>/avatars`)
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Public base URL used when producing avatar URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            public_base_url: default_public_base_url(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl UploadConfig {
    /// Directory avatar files are written to.
    pub fn avatars_dir(&self) -> PathBuf {
        self.path.join("avatars")
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_public_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("MENTORBRIDGE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("MENTORBRIDGE_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("MENTORBRIDGE_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }
        if let Ok(url) = std::env::var("MENTORBRIDGE_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("MENTORBRIDGE_AUTH_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Ok(path) = std::env::var("MENTORBRIDGE_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }
        if let Ok(base_url) = std::env::var("MENTORBRIDGE_UPLOAD_PUBLIC_BASE_URL") {
            self.upload.public_base_url = base_url;
        }
    }
}
