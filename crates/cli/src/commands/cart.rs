//! Cart snapshot commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the persisted cart
//! cm-cli cart show
//!
//! # Delete the persisted cart snapshot
//! cm-cli cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATA_DIR` - Directory holding the snapshot files (default: `data`)

use cedar_market_core::Cart;
use cedar_market_storefront::storage::{Storage, StorageError, keys};
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCmdError {
    /// Snapshot directory could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Print the persisted cart.
pub async fn show() -> Result<(), CartCmdError> {
    dotenvy::dotenv().ok();

    let storage = Storage::open(super::data_dir()).await?;
    let cart: Cart = storage.load(keys::CART).await.unwrap_or_default();

    #[allow(clippy::print_stdout)]
    {
        if cart.is_empty() {
            println!("Cart is empty");
        } else {
            for item in cart.items() {
                println!(
                    "{:>4} x {} @ {} = {}",
                    item.quantity,
                    item.name,
                    item.price,
                    item.line_total()
                );
            }
            println!("Total: {} ({} items)", cart.total(), cart.item_count());
        }
    }
    Ok(())
}

/// Delete the persisted cart snapshot.
pub async fn clear() -> Result<(), CartCmdError> {
    dotenvy::dotenv().ok();

    let storage = Storage::open(super::data_dir()).await?;
    storage.remove(keys::CART).await?;

    tracing::info!("Cart snapshot removed");
    Ok(())
}
