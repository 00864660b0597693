//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Upload storage configuration (optional; uploads disabled when absent).
    #[serde(default)]
    pub storage: Option<StorageSettings>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// Upload storage configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// S3 bucket name.
    pub bucket: String,
    /// S3 region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Optional custom endpoint (S3-compatible providers).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Presigned upload URL lifetime in seconds.
    #[serde(default = "default_presign_ttl")]
    pub presign_upload_ttl_secs: u64,
}

fn default_region() -> String {
    "eu-north-1".to_string()
}

fn default_presign_ttl() -> u64 {
    600
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MIOSAAS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults() {
        let settings: StorageSettings = serde_json::from_value(serde_json::json!({
            "bucket": "miosaas-uploads",
            "access_key_id": "key",
            "secret_access_key": "secret",
        }))
        .unwrap();

        assert_eq!(settings.region, "eu-north-1");
        assert_eq!(settings.presign_upload_ttl_secs, 600);
        assert!(settings.endpoint.is_none());
    }

    #[test]
    fn test_server_defaults() {
        let server: ServerConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }
}
