//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COMMERCE_API_URL` - Base URL of the commerce backend (REST/JSON)
//! - `COMMERCE_SERVICE_KEY` - Service-role API key (server-side only)
//! - `IMAGE_HOST_UPLOAD_URL` - Image host upload endpoint
//! - `IMAGE_HOST_API_KEY` - Image host API key
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Commerce backend configuration
    pub backend: AdminBackendConfig,
    /// Image host configuration
    pub images: ImageHostConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Commerce backend configuration for the admin console.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct AdminBackendConfig {
    /// Base URL of the commerce backend
    pub api_url: String,
    /// Service-role API key; bypasses row-level authorization
    pub service_key: SecretString,
}

impl std::fmt::Debug for AdminBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBackendConfig")
            .field("api_url", &self.api_url)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// Image host configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ImageHostConfig {
    /// Upload endpoint; accepts a multipart file, returns a durable URL
    pub upload_url: String,
    /// API key sent with every upload
    pub api_key: SecretString,
}

impl std::fmt::Debug for ImageHostConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHostConfig")
            .field("upload_url", &self.upload_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let backend = AdminBackendConfig {
            api_url: get_required_env("COMMERCE_API_URL")?,
            service_key: SecretString::from(get_required_env("COMMERCE_SERVICE_KEY")?),
        };
        let images = ImageHostConfig {
            upload_url: get_required_env("IMAGE_HOST_UPLOAD_URL")?,
            api_key: SecretString::from(get_required_env("IMAGE_HOST_API_KEY")?),
        };
        let sentry_dsn = std::env::var("SENTRY_DSN").ok();

        Ok(Self {
            host,
            port,
            backend,
            images,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AdminBackendConfig {
            api_url: "http://localhost:4000".to_string(),
            service_key: SecretString::from("super_secret_service_key"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_service_key"));

        let config = ImageHostConfig {
            upload_url: "https://img.example.test/upload".to_string(),
            api_key: SecretString::from("super_secret_image_key"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_image_key"));
    }
}
