//! Special offers route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::Offer;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Offer display data for templates.
#[derive(Clone)]
pub struct OfferView {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub original_price: String,
    pub discounted_price: String,
    pub discount_percent: u32,
    pub time_left: Option<String>,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Offer> for OfferView {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id.as_i64(),
            product_id: offer.product_id.as_i64(),
            name: offer.name.clone(),
            description: offer.description.clone(),
            image_url: offer.image_url.clone(),
            original_price: offer.original_price.display(),
            discounted_price: offer.discounted_price.display(),
            discount_percent: offer.discount_percent,
            time_left: offer.time_left.clone(),
            stock: offer.stock,
            in_stock: offer.in_stock(),
        }
    }
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Offers listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "offers/index.html")]
pub struct OffersIndexTemplate {
    pub offers: Vec<OfferView>,
    pub search: String,
    pub unavailable: bool,
    pub current_user: Option<String>,
}

/// Display the special offers page, optionally filtered by name.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let search = query.search.unwrap_or_default();
    let needle = search.trim().to_lowercase();

    let (offers, unavailable) = match state.catalog().offers().await {
        Ok(offers) => {
            let views = offers
                .iter()
                .filter(|o| needle.is_empty() || o.name.to_lowercase().contains(&needle))
                .map(OfferView::from)
                .collect();
            (views, false)
        }
        Err(e) => {
            tracing::error!("Failed to fetch offers: {e}");
            (Vec::new(), true)
        }
    };

    OffersIndexTemplate {
        offers,
        search,
        unavailable,
        current_user: user.map(|u| u.display_name().to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cedar_market_core::{OfferId, Price, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_offer_view_formatting() {
        let offer = Offer {
            id: OfferId::new(2),
            product_id: ProductId::new(9),
            name: "Olive Oil 1L".to_string(),
            description: None,
            image_url: None,
            original_price: Price::new(Decimal::from(8)),
            discounted_price: Price::new(Decimal::from(6)),
            discount_percent: 25,
            time_left: Some("2 days".to_string()),
            stock: 3,
        };

        let view = OfferView::from(&offer);
        assert_eq!(view.product_id, 9);
        assert_eq!(view.original_price, "8.00 JD");
        assert_eq!(view.discounted_price, "6.00 JD");
        assert_eq!(view.discount_percent, 25);
        assert!(view.in_stock);
    }
}
