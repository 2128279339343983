//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults run a fully working demo
//! deployment with the built-in catalog.
//!
//! - `FRESHMART_HOST` - Bind address (default: 127.0.0.1)
//! - `FRESHMART_PORT` - Listen port (default: 3000)
//! - `FRESHMART_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `CATALOG_PATH` - JSON catalog overriding the built-in seed data
//! - `MEAL_PLANNER_URL` - Meal-planner service base URL
//!   (default: http://localhost:4000)
//! - `MEAL_PLANNER_API_KEY` - Bearer token for the planner service
//! - `MEAL_PLANNER_TIMEOUT_SECS` - Planner request timeout (default: 30)
//! - `FREE_DELIVERY_THRESHOLD` - Subtotal above which delivery is free
//!   (default: 50)
//! - `DELIVERY_FEE` - Flat delivery fee below the threshold
//!   (default: 5.99)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use freshmart_core::Price;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct FreshmartConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Optional catalog file overriding the built-in seed data
    pub catalog_path: Option<PathBuf>,
    /// Meal-planner service configuration
    pub planner: MealPlannerConfig,
    /// Delivery pricing configuration
    pub delivery: DeliveryConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Meal-planner service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MealPlannerConfig {
    /// Base URL of the planner service
    pub base_url: String,
    /// Optional bearer token
    pub api_key: Option<SecretString>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for MealPlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealPlannerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Delivery pricing knobs shown in the order summary.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Subtotal above which delivery is free
    pub free_threshold: Price,
    /// Flat fee charged below the threshold
    pub fee: Price,
}

impl FreshmartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but fails to
    /// parse, or if `FRESHMART_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parsed_var("FRESHMART_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parsed_var("FRESHMART_PORT", 3000)?;
        let base_url =
            optional_var("FRESHMART_BASE_URL").unwrap_or_else(|| "http://localhost:3000".into());
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("FRESHMART_BASE_URL".into(), e.to_string()))?;

        let planner = MealPlannerConfig {
            base_url: optional_var("MEAL_PLANNER_URL")
                .unwrap_or_else(|| "http://localhost:4000".into()),
            api_key: optional_var("MEAL_PLANNER_API_KEY").map(SecretString::from),
            timeout_secs: parsed_var("MEAL_PLANNER_TIMEOUT_SECS", 30)?,
        };

        let delivery = DeliveryConfig {
            free_threshold: Price::new(parsed_var("FREE_DELIVERY_THRESHOLD", Decimal::from(50))?),
            fee: parsed_var("DELIVERY_FEE", Decimal::new(599, 2)).map(Price::new)?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path: optional_var("CATALOG_PATH").map(PathBuf::from),
            planner,
            delivery,
            sentry_dsn: optional_var("SENTRY_DSN"),
            sentry_environment: optional_var("SENTRY_ENVIRONMENT"),
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS (controls the secure
    /// flag on session cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Read an optional environment variable, treating empty as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Read an environment variable and parse it, falling back to `default`
/// when unset.
fn parsed_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.into(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_need_no_environment() {
        let config = FreshmartConfig::from_env().expect("defaults must load");
        assert_eq!(config.port, 3000);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.planner.base_url, "http://localhost:4000");
        assert_eq!(config.delivery.fee, Price::new(Decimal::new(599, 2)));
        assert!(!config.is_secure());
    }

    #[test]
    fn test_planner_debug_redacts_api_key() {
        let planner = MealPlannerConfig {
            base_url: "http://localhost:4000".into(),
            api_key: Some(SecretString::from("sk-very-secret")),
            timeout_secs: 30,
        };
        let debug = format!("{planner:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
