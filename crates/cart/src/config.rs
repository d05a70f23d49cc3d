//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `INVENTORY_API_URL` - Base URL of the inventory service (default: `http://localhost:3333`)
//! - `INVENTORY_TIMEOUT_SECS` - Request timeout in seconds (default: 10)
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `CART_STORAGE_KEY` - Key the cart is stored under (default: `@RocketShoes:cart`)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Key the cart is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_INVENTORY_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory service configuration
    pub inventory: InventoryConfig,
    /// Persistent store configuration
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL; `/stock/{id}` and `/products/{id}` are resolved against it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Persistent store configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = parse_base_url(
            "INVENTORY_API_URL",
            &get_or_default("INVENTORY_API_URL", DEFAULT_INVENTORY_URL),
        )?;
        let timeout_secs = get_or_default("INVENTORY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("INVENTORY_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "INVENTORY_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let dir = PathBuf::from(get_or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR));
        let key = get_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            inventory: InventoryConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            storage: StorageConfig { dir, key },
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }
}

impl InventoryConfig {
    /// Configuration for an inventory service at `base_url` with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Parse and validate an HTTP(S) base URL.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("expected an http(s) URL, got '{value}'"),
        ));
    }
    Ok(url)
}
