//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Session storage key for the cart (default: cart-storage)
//! - `CART_STORAGE_PATH` - File backing the session store (default: .cart-session.json)
//! - `CART_CATALOG_PATH` - Product catalog file (`.json`, `.yaml` or `.yml`)

use std::path::PathBuf;

use thiserror::Error;

use crate::persistence::DEFAULT_STORAGE_KEY;

const DEFAULT_STORAGE_PATH: &str = ".cart-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid setting {0}: {1}")]
    InvalidSetting(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key the cart items are persisted under
    pub storage_key: String,
    /// File backing the session store
    pub storage_path: PathBuf,
    /// Product catalog file
    pub catalog_path: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            catalog_path: None,
        }
    }
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
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_key = lookup("CART_STORAGE_KEY")
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage_path = non_empty_path(&lookup, "CART_STORAGE_PATH")?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH));
        let catalog_path = non_empty_path(&lookup, "CART_CATALOG_PATH")?;

        Ok(Self {
            storage_key,
            storage_path,
            catalog_path,
        })
    }

    /// Check settings that may have been changed after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSetting` if the storage key or a path is
    /// blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(invalid_setting("storage key"));
        }
        if self.storage_path.as_os_str().is_empty() {
            return Err(invalid_setting("storage path"));
        }
        if self
            .catalog_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(invalid_setting("catalog path"));
        }
        Ok(())
    }

    /// The catalog path, which commands that read products need.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no catalog path is configured.
    pub fn require_catalog_path(&self) -> Result<&PathBuf, ConfigError> {
        self.catalog_path
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CART_CATALOG_PATH".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid_setting(name: &str) -> ConfigError {
    ConfigError::InvalidSetting(name.to_string(), "must not be empty".to_string())
}

/// Read an optional path variable, rejecting blank values.
fn non_empty_path(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<PathBuf>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be empty".to_string(),
        )),
        Some(value) => Ok(Some(PathBuf::from(value))),
    }
}
