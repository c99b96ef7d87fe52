//! Server configuration loaded from the environment

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

use crate::jwt::JwtConfig;

/// Development signing secret used when `JWT_SECRET` is unset
pub const DEFAULT_JWT_SECRET: &str = "hope-sanctuary-development-secret";

/// Server configuration
///
/// # Environment Variables
/// - `HOST`: bind address (default: `0.0.0.0`)
/// - `PORT`: listen port (default: 5000)
/// - `UPLOADS_DIR`: directory for uploaded pictures (default: `uploads`)
/// - `MAX_UPLOAD_BYTES`: body limit on pet write routes (default: 10 MiB)
/// - `JWT_SECRET`: HMAC signing secret
/// - `JWT_EXPIRY_SECONDS`: token lifetime (default: 86400)
/// - `ADMIN_EMAIL` / `ADMIN_PASSWORD`: credentials of the seeded admin
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub jwt_secret: String,
    pub jwt_expiry_seconds: u64,
    pub admin_email: String,
    pub admin_password: String,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 5000)?
            .set_default("uploads_dir", "uploads")?
            .set_default("max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt_expiry_seconds", 86_400)?
            .set_default("admin_email", "admin@hopesanctuary.local")?
            .set_default("admin_password", "Admin@12345")?
            .add_source(Environment::default())
            .build()
            .context("Failed to read server configuration")?
            .try_deserialize()
            .context("Invalid server configuration")
    }

    /// Address to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// JWT settings derived from this configuration
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            expiry_seconds: self.jwt_expiry_seconds,
        }
    }

    /// Whether the development signing secret is still in use
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
