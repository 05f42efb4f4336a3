//! The shopping cart service.
//!
//! Wraps the pure [`Cart`] model with the two concerns the model itself
//! stays out of: the session gate and persistence. Every mutation requires
//! a signed-in user (except [`CartStore::clear`], which is part of session
//! teardown), and every applied mutation is written to the cart snapshot
//! before it becomes visible to readers. A mutation whose snapshot write
//! fails is rolled back, so memory never runs ahead of disk.

use std::sync::Arc;

use cedar_market_core::{Cart, CartEvent, LineItem, Price, ProductId};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::services::session::SessionService;
use crate::storage::{self, Storage, StorageError};

/// Errors that can occur while mutating the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// A mutation was attempted without a signed-in user.
    #[error("Sign in required")]
    Unauthenticated,

    /// The cart snapshot could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Session-gated, persisted shopping cart.
///
/// Cheap to clone; clones share the same underlying cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Storage,
    sessions: SessionService,
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Open the store, restoring the persisted cart snapshot if one exists.
    ///
    /// A missing or corrupt snapshot starts the cart empty.
    pub async fn open(storage: Storage, sessions: SessionService) -> Self {
        let cart = storage
            .load::<Cart>(storage::keys::CART)
            .await
            .unwrap_or_default();
        if !cart.is_empty() {
            tracing::debug!(lines = cart.len(), "Restored cart snapshot");
        }
        Self {
            inner: Arc::new(CartStoreInner {
                storage,
                sessions,
                cart: RwLock::new(cart),
            }),
        }
    }

    async fn require_session(&self) -> Result<(), CartError> {
        if self.inner.sessions.is_signed_in().await {
            Ok(())
        } else {
            Err(CartError::Unauthenticated)
        }
    }

    async fn persist(&self, cart: &Cart) -> Result<(), StorageError> {
        self.inner.storage.save(storage::keys::CART, cart).await
    }

    /// Add an item, merging quantities with an existing line for the same
    /// product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unauthenticated` without a signed-in user, or
    /// `CartError::Storage` if the snapshot write fails.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub async fn add(&self, item: LineItem) -> Result<CartEvent, CartError> {
        self.require_session().await?;
        let mut guard = self.inner.cart.write().await;
        let mut next = guard.clone();
        let event = next.add(item);
        self.persist(&next).await?;
        *guard = next;
        Ok(event)
    }

    /// Replace the line for `item.id` wholesale with the given item.
    ///
    /// Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unauthenticated` without a signed-in user, or
    /// `CartError::Storage` if the snapshot write fails.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub async fn update(&self, item: LineItem) -> Result<(), CartError> {
        self.require_session().await?;
        let mut guard = self.inner.cart.write().await;
        let mut next = guard.clone();
        next.update(item);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    /// Set the quantity of an existing line, if the new quantity is within
    /// `1..=stock`. Out-of-range quantities and unknown products are
    /// silently rejected; the return value says whether the change applied.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unauthenticated` without a signed-in user, or
    /// `CartError::Storage` if the snapshot write fails.
    #[instrument(skip(self))]
    pub async fn set_quantity(&self, id: ProductId, quantity: u32) -> Result<bool, CartError> {
        self.require_session().await?;
        let mut guard = self.inner.cart.write().await;
        let mut next = guard.clone();
        if !next.set_quantity(id, quantity) {
            return Ok(false);
        }
        self.persist(&next).await?;
        *guard = next;
        Ok(true)
    }

    /// Remove the line for a product. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unauthenticated` without a signed-in user, or
    /// `CartError::Storage` if the snapshot write fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: ProductId) -> Result<(), CartError> {
        self.require_session().await?;
        let mut guard = self.inner.cart.write().await;
        let mut next = guard.clone();
        next.remove(id);
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    /// Empty the cart and delete its snapshot.
    ///
    /// Not session-gated: this runs during logout, after the session is
    /// already gone.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the snapshot cannot be removed.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        let mut guard = self.inner.cart.write().await;
        self.inner.storage.remove(storage::keys::CART).await?;
        guard.clear();
        Ok(())
    }

    /// A point-in-time copy of the cart.
    pub async fn snapshot(&self) -> Cart {
        self.inner.cart.read().await.clone()
    }

    /// A copy of the cart lines, in first-add order.
    pub async fn items(&self) -> Vec<LineItem> {
        self.inner.cart.read().await.items().to_vec()
    }

    /// The line for a product, if present.
    pub async fn get(&self, id: ProductId) -> Option<LineItem> {
        self.inner.cart.read().await.get(id).cloned()
    }

    /// Total quantity across all lines.
    pub async fn item_count(&self) -> u32 {
        self.inner.cart.read().await.item_count()
    }

    /// Sum of line totals.
    pub async fn total(&self) -> Price {
        self.inner.cart.read().await.total()
    }

    /// Whether the cart has no lines.
    pub async fn is_empty(&self) -> bool {
        self.inner.cart.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::CurrentUser;

    fn line(id: i64, price: &str, stock: u32, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::new(price.parse::<Decimal>().unwrap()),
            stock,
            quantity,
        }
    }

    async fn test_store() -> (CartStore, SessionService, Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).await.unwrap();
        let sessions = SessionService::open(storage.clone()).await;
        let store = CartStore::open(storage.clone(), sessions.clone()).await;
        (store, sessions, storage, dir)
    }

    async fn sign_in(sessions: &SessionService) {
        sessions
            .sign_in(CurrentUser {
                name: "Layla".to_string(),
                email: "layla@example.com".to_string(),
                token: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unauthenticated_add_is_rejected() {
        let (store, _sessions, _storage, _dir) = test_store().await;

        let result = store.add(line(1, "2.50", 10, 1)).await;
        assert!(matches!(result, Err(CartError::Unauthenticated)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unauthenticated_mutations_are_rejected() {
        let (store, _sessions, _storage, _dir) = test_store().await;

        assert!(matches!(
            store.update(line(1, "2.50", 10, 2)).await,
            Err(CartError::Unauthenticated)
        ));
        assert!(matches!(
            store.set_quantity(ProductId::new(1), 2).await,
            Err(CartError::Unauthenticated)
        ));
        assert!(matches!(
            store.remove(ProductId::new(1)).await,
            Err(CartError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_add_merges_and_persists() {
        let (store, sessions, storage, _dir) = test_store().await;
        sign_in(&sessions).await;

        assert!(matches!(
            store.add(line(1, "2.50", 10, 2)).await.unwrap(),
            CartEvent::Added
        ));
        assert!(matches!(
            store.add(line(1, "2.50", 10, 3)).await.unwrap(),
            CartEvent::QuantityUpdated
        ));
        assert_eq!(store.item_count().await, 5);

        // The snapshot on disk matches what readers see
        let reopened = CartStore::open(storage, sessions).await;
        assert_eq!(reopened.item_count().await, 5);
        assert_eq!(reopened.get(ProductId::new(1)).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_set_quantity_rejection_changes_nothing() {
        let (store, sessions, storage, _dir) = test_store().await;
        sign_in(&sessions).await;
        store.add(line(1, "2.50", 5, 2)).await.unwrap();

        assert!(!store.set_quantity(ProductId::new(1), 99).await.unwrap());
        assert!(!store.set_quantity(ProductId::new(1), 0).await.unwrap());
        assert_eq!(store.get(ProductId::new(1)).await.unwrap().quantity, 2);

        let reopened = CartStore::open(storage, sessions).await;
        assert_eq!(reopened.get(ProductId::new(1)).await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_clear_removes_snapshot() {
        let (store, sessions, storage, _dir) = test_store().await;
        sign_in(&sessions).await;
        store.add(line(1, "2.50", 10, 2)).await.unwrap();

        // Clear works even after sign-out, as part of session teardown
        sessions.sign_out().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty().await);

        let reopened = CartStore::open(storage, sessions).await;
        assert!(reopened.is_empty().await);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("cart.json"), b"{not an array")
            .await
            .unwrap();

        let storage = Storage::open(dir.path()).await.unwrap();
        let sessions = SessionService::open(storage.clone()).await;
        let store = CartStore::open(storage, sessions).await;
        assert!(store.is_empty().await);
        assert_eq!(store.total().await, Price::ZERO);
    }

    #[tokio::test]
    async fn test_total_over_multiple_lines() {
        let (store, sessions, _storage, _dir) = test_store().await;
        sign_in(&sessions).await;

        store.add(line(1, "10.00", 10, 2)).await.unwrap();
        store.add(line(2, "5.00", 10, 1)).await.unwrap();
        assert_eq!(store.total().await.amount(), Decimal::new(2500, 2));
    }
}
