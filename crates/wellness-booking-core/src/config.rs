//! Runtime configuration from the environment.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::calendar::SystemClock;
use crate::catalog::{CatalogError, StaticCatalog};
use crate::wizard::BookingWizard;

/// Optional catalog document path.
pub const CATALOG_PATH_VAR: &str = "WELLNESS_CATALOG_PATH";

/// Simulated confirmation latency in milliseconds.
pub const CONFIRMATION_DELAY_VAR: &str = "WELLNESS_CONFIRMATION_DELAY_MS";

pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_millis(1500);

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfig {
    /// Catalog document to load instead of the built-in data
    pub catalog_path: Option<PathBuf>,
    /// Simulated backend latency before a confirmation completes
    pub confirmation_delay: Duration,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            confirmation_delay: DEFAULT_CONFIRMATION_DELAY,
        }
    }
}

impl BookingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let catalog_path = lookup(CATALOG_PATH_VAR)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let confirmation_delay = match lookup(CONFIRMATION_DELAY_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!(
                        "{} is not a number of milliseconds ('{}'), using default",
                        CONFIRMATION_DELAY_VAR, raw
                    );
                    DEFAULT_CONFIRMATION_DELAY
                }
            },
            None => DEFAULT_CONFIRMATION_DELAY,
        };

        Self {
            catalog_path,
            confirmation_delay,
        }
    }

    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> ConfigResult<StaticCatalog> {
        match &self.catalog_path {
            Some(path) => Ok(StaticCatalog::from_path(path)?),
            None => Ok(StaticCatalog::builtin()),
        }
    }

    /// Create a wizard over the configured catalog and the system clock.
    pub fn build_wizard(&self) -> ConfigResult<BookingWizard> {
        let catalog = self.load_catalog()?;
        Ok(BookingWizard::new(Arc::new(catalog), Arc::new(SystemClock)))
    }
}
