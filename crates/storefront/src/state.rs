//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::FreshmartConfig;
use crate::services::planner::{MealPlannerClient, PlannerError};
use crate::stores::{KeyValueStore, MemoryStore};

/// Error constructing the application state.
#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("planner client error: {0}")]
    Planner(#[from] PlannerError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the read-only catalog, the durable
/// client-state backend, and the meal-planner client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: FreshmartConfig,
    catalog: Catalog,
    storage: Arc<dyn KeyValueStore>,
    planner: MealPlannerClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads the catalog named by `CATALOG_PATH`, or the built-in seed
    /// catalog when no override is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog fails validation or the planner
    /// HTTP client cannot be built.
    pub fn new(config: FreshmartConfig) -> Result<Self, AppStateError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_file(path)?,
            None => Catalog::builtin()?,
        };
        let planner = MealPlannerClient::new(&config.planner)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage: Arc::new(MemoryStore::new()),
                planner,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &FreshmartConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a handle to the durable client-state backend.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        self.inner.storage.clone()
    }

    /// Get a reference to the meal-planner client.
    #[must_use]
    pub fn planner(&self) -> &MealPlannerClient {
        &self.inner.planner
    }
}
