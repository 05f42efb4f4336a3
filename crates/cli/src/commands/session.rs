//! Session snapshot commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the persisted session
//! cm-cli session show
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATA_DIR` - Directory holding the snapshot files (default: `data`)

use cedar_market_storefront::models::CurrentUser;
use cedar_market_storefront::storage::{Storage, StorageError, keys};
use thiserror::Error;

/// Errors that can occur during session commands.
#[derive(Debug, Error)]
pub enum SessionCmdError {
    /// Snapshot directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Print the persisted session.
pub async fn show() -> Result<(), SessionCmdError> {
    dotenvy::dotenv().ok();

    let storage = Storage::open(super::data_dir()).await?;
    let user: Option<CurrentUser> = storage.load(keys::SESSION).await;

    #[allow(clippy::print_stdout)]
    {
        match user {
            Some(user) => {
                println!("Signed in as {} <{}>", user.display_name(), user.email);
                if user.token.is_some() {
                    println!("API token: present");
                }
            }
            None => println!("No active session"),
        }
    }
    Ok(())
}
