//! Catalog API commands.
//!
//! # Usage
//!
//! ```bash
//! # List products served by the catalog API
//! cm-cli catalog products
//!
//! # List special offers served by the catalog API
//! cm-cli catalog offers
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Base URL of the catalog API

use cedar_market_storefront::catalog::{CatalogClient, CatalogError};
use thiserror::Error;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCmdError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The catalog API call failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

fn client() -> Result<CatalogClient, CatalogCmdError> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("CATALOG_API_URL")
        .map_err(|_| CatalogCmdError::MissingEnvVar("CATALOG_API_URL"))?;
    Ok(CatalogClient::new(&base_url)?)
}

/// List products served by the catalog API.
pub async fn products() -> Result<(), CatalogCmdError> {
    let client = client()?;

    tracing::info!("Fetching products...");
    let products = client.products().await?;

    #[allow(clippy::print_stdout)]
    {
        for product in &products {
            println!(
                "#{:<5} {} - {} (stock {})",
                product.id, product.name, product.price, product.stock
            );
        }
        println!("{} products", products.len());
    }
    Ok(())
}

/// List special offers served by the catalog API.
pub async fn offers() -> Result<(), CatalogCmdError> {
    let client = client()?;

    tracing::info!("Fetching offers...");
    let offers = client.offers().await?;

    #[allow(clippy::print_stdout)]
    {
        for offer in &offers {
            println!(
                "#{:<5} {} - {} (was {}, {}% off, product #{})",
                offer.id,
                offer.name,
                offer.discounted_price,
                offer.original_price,
                offer.discount_percent,
                offer.product_id
            );
        }
        println!("{} offers", offers.len());
    }
    Ok(())
}
