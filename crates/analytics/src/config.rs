//! Analytics configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ZENTHRA_STORE_URL` - Base URL of the record store (e.g.
//!   `http://127.0.0.1:8090`)
//!
//! ## Optional
//! - `ZENTHRA_STORE_TOKEN` - API token sent in the `Authorization` header
//!   for authenticated reads

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but unusable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Record store connection settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the record store.
    pub base_url: Url,
    /// Optional API token for authenticated reads.
    pub token: Option<SecretString>,
}

impl StoreConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `ZENTHRA_STORE_URL` is missing or does not
    /// parse as a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("ZENTHRA_STORE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("ZENTHRA_STORE_URL".to_owned()))?;
        let base_url = Url::parse(&raw_url).map_err(|err| {
            ConfigError::InvalidEnvVar("ZENTHRA_STORE_URL".to_owned(), err.to_string())
        })?;

        let token = std::env::var("ZENTHRA_STORE_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
            .map(SecretString::from);

        Ok(Self { base_url, token })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("ZENTHRA_STORE_URL".to_owned());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: ZENTHRA_STORE_URL"
        );
    }

    #[test]
    fn test_store_config_debug_redacts_token() {
        let config = StoreConfig {
            base_url: Url::parse("http://127.0.0.1:8090").unwrap(),
            token: Some(SecretString::from("super-secret".to_owned())),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
