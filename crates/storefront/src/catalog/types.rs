//! Catalog API data types.
//!
//! The wire records mirror what the API actually sends, which is looser
//! than what the storefront wants to render: prices arrive as numbers or
//! strings, and most fields can be null or missing. Each record converts
//! into a cleaned domain type, filling defaults (price 0, stock 0, empty
//! name) so one sloppy row never breaks a listing. Records without an id
//! cannot be added to a cart or keyed in a template, so they are dropped
//! during conversion.

use cedar_market_core::{LineItem, OfferId, Price, ProductId};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A product row as the catalog API sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// A catalog product, cleaned for rendering and cart use.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub stock: u32,
    pub image_url: Option<String>,
    pub weight: Option<f64>,
    pub manufacturer: Option<String>,
    pub category_name: Option<String>,
}

impl Product {
    /// Convert a wire record, dropping it if it has no id.
    #[must_use]
    pub fn from_record(record: ProductRecord) -> Option<Self> {
        let id = record.id?;
        Some(Self {
            id: ProductId::new(id),
            name: record.name.unwrap_or_default(),
            description: record.description.filter(|d| !d.is_empty()),
            price: record.price.unwrap_or(Price::ZERO),
            stock: record.stock.unwrap_or(0),
            image_url: record.image_url.filter(|u| !u.is_empty()),
            weight: record.weight,
            manufacturer: record.manufacturer.filter(|m| !m.is_empty()),
            category_name: record.category_name.filter(|c| !c.is_empty()),
        })
    }

    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Build a cart line for this product.
    #[must_use]
    pub fn to_line_item(&self, quantity: u32) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            stock: self.stock,
            quantity,
        }
    }
}

/// A special offer row as the catalog API sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub discounted_price: Option<Price>,
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
    #[serde(default)]
    pub time_left: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

/// A special offer, cleaned for rendering and cart use.
///
/// Adding an offer to the cart keys the line by the underlying
/// `product_id` at the discounted price, so an offer and its plain product
/// merge into one line.
#[derive(Debug, Clone)]
pub struct Offer {
    pub id: OfferId,
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub original_price: Price,
    pub discounted_price: Price,
    pub discount_percent: u32,
    pub time_left: Option<String>,
    pub stock: u32,
}

impl Offer {
    /// Convert a wire record, dropping it if it lacks an id or product id.
    #[must_use]
    pub fn from_record(record: OfferRecord) -> Option<Self> {
        let id = record.id?;
        let product_id = record.product_id?;
        let original_price = record.original_price.unwrap_or(Price::ZERO);
        let discounted_price = record.discounted_price.unwrap_or(Price::ZERO);
        let discount_percent = record
            .discount_percentage
            .and_then(|d| d.round().to_u32())
            .unwrap_or_else(|| percent_off(original_price, discounted_price));
        Some(Self {
            id: OfferId::new(id),
            product_id: ProductId::new(product_id),
            name: record.name.unwrap_or_default(),
            description: record.description.filter(|d| !d.is_empty()),
            image_url: record.image_url.filter(|u| !u.is_empty()),
            original_price,
            discounted_price,
            discount_percent,
            time_left: record.time_left.filter(|t| !t.is_empty()),
            stock: record.stock.unwrap_or(0),
        })
    }

    /// Whether the offer can currently be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Build a cart line for this offer, keyed by the underlying product.
    #[must_use]
    pub fn to_line_item(&self, quantity: u32) -> LineItem {
        LineItem {
            id: self.product_id,
            name: self.name.clone(),
            price: self.discounted_price,
            stock: self.stock,
            quantity,
        }
    }
}

/// Discount percentage derived from the two prices, when the API omits it.
fn percent_off(original: Price, discounted: Price) -> u32 {
    if original.amount() <= Decimal::ZERO || discounted.amount() >= original.amount() {
        return 0;
    }
    let ratio = (original.amount() - discounted.amount()) / original.amount();
    (ratio * Decimal::from(100_u32)).round().to_u32().unwrap_or(0)
}

/// Response body for a successful register or login call.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// The user object inside an [`AuthResponse`].
#[derive(Debug, Default, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for order submission.
#[derive(Debug, Serialize)]
pub struct OrderRequest<'a> {
    pub user: OrderUser<'a>,
    pub items: &'a [LineItem],
}

/// The contact block of an [`OrderRequest`].
#[derive(Debug, Serialize)]
pub struct OrderUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}
