//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::services::{CartStore, SessionService};
use crate::storage::{Storage, StorageError};

/// Error initializing the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("catalog client error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client, the cart, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    sessions: SessionService,
    cart: CartStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Opens the snapshot storage, restores any persisted session and cart,
    /// and builds the catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// catalog client cannot be built.
    pub async fn new(config: StorefrontConfig) -> Result<Self, StateInitError> {
        let storage = Storage::open(config.data_dir.clone()).await?;
        let catalog = CatalogClient::new(config.catalog_api_url.as_str())?;
        let sessions = SessionService::open(storage.clone()).await;
        let cart = CartStore::open(storage, sessions.clone()).await;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions,
                cart,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the session service.
    #[must_use]
    pub fn sessions(&self) -> &SessionService {
        &self.inner.sessions
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
