//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use cedar_market_core::ProductId;
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::Product;
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Maximum suggestions returned for the search box.
const MAX_SUGGESTIONS: usize = 5;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub weight: Option<String>,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub stock: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            weight: product
                .weight
                .filter(|w| *w > 0.0)
                .map(|w| format!("{w:.2} kg")),
            manufacturer: product.manufacturer.clone(),
            category: product.category_name.clone(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock(),
            stock: product.stock,
        }
    }
}

/// A single search suggestion line.
#[derive(Clone)]
pub struct SuggestionView {
    pub name: String,
    pub href: String,
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub search: String,
    pub unavailable: bool,
    pub current_user: Option<String>,
}

/// Search suggestions fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/suggestions.html")]
pub struct SuggestionsTemplate {
    pub suggestions: Vec<SuggestionView>,
}

/// Quick view fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/quick_view.html")]
pub struct QuickViewTemplate {
    pub product: ProductView,
    /// Quantity already in the cart, when the product has a line there.
    pub in_cart_quantity: Option<u32>,
}

/// Case-insensitive name match shared by the listing and suggestions.
///
/// The needle must already be lowercased.
fn matches_search(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
}

fn suggestion_href(name: &str) -> String {
    format!("/products?search={}", urlencoding::encode(name))
}

/// Display the product listing page, optionally filtered by name.
///
/// A catalog outage degrades to an empty grid with a notice rather than
/// an error page, so the rest of the storefront stays usable.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.search.unwrap_or_default();
    let needle = search.trim().to_lowercase();

    let (products, unavailable) = match state.catalog().products().await {
        Ok(products) => {
            let views = products
                .iter()
                .filter(|p| needle.is_empty() || matches_search(p, &needle))
                .map(ProductView::from)
                .collect();
            (views, false)
        }
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (Vec::new(), true)
        }
    };

    ProductsIndexTemplate {
        products,
        search,
        unavailable,
        current_user: user.map(|u| u.display_name().to_string()),
    }
}

/// Display search suggestions fragment (for HTMX).
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let needle = query
        .search
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if needle.is_empty() {
        return SuggestionsTemplate {
            suggestions: Vec::new(),
        };
    }

    let suggestions = match state.catalog().products().await {
        Ok(products) => products
            .iter()
            .filter(|p| matches_search(p, &needle))
            .take(MAX_SUGGESTIONS)
            .map(|p| SuggestionView {
                name: p.name.clone(),
                href: suggestion_href(&p.name),
            })
            .collect(),
        Err(e) => {
            // The box stays empty; the listing page reports the outage
            tracing::warn!("Failed to fetch suggestions: {e}");
            Vec::new()
        }
    };

    SuggestionsTemplate { suggestions }
}

/// Display the quick view fragment (for HTMX).
#[instrument(skip(state))]
pub async fn quick_view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .find_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;

    let in_cart_quantity = state.cart().get(id).await.map(|line| line.quantity);

    Ok(QuickViewTemplate {
        product: ProductView::from(&product),
        in_cart_quantity,
    })
}
