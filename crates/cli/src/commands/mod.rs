//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod session;

use std::path::PathBuf;

/// Snapshot directory shared with the storefront binary.
///
/// Reads `STOREFRONT_DATA_DIR`, defaulting to `data` like the storefront
/// config does.
pub(crate) fn data_dir() -> PathBuf {
    std::env::var("STOREFRONT_DATA_DIR").map_or_else(|_| PathBuf::from("data"), PathBuf::from)
}
