//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::products::ProductView;
use crate::state::AppState;

// =============================================================================
// Hero Configuration (static content for the carousel)
// =============================================================================

/// A single slide in the hero carousel.
#[derive(Clone)]
pub struct HeroSlide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub image_path: String,
    pub image_alt: String,
}

/// Hero carousel configuration.
#[derive(Clone)]
pub struct HeroConfig {
    pub slides: Vec<HeroSlide>,
    pub autoplay_ms: Option<u32>,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            slides: vec![
                HeroSlide {
                    title: Some("Fresh Groceries, Every Morning".to_string()),
                    subtitle: Some(
                        "Everyday staples and local produce, restocked daily and delivered across town.".to_string(),
                    ),
                    button_text: Some("Shop Products".to_string()),
                    button_url: Some("/products".to_string()),
                    image_path: "/static/images/hero/hero-produce.svg".to_string(),
                    image_alt: "Crates of fresh produce".to_string(),
                },
                HeroSlide {
                    title: Some("This Week's Special Offers".to_string()),
                    subtitle: Some("Limited-time prices on pantry favorites.".to_string()),
                    button_text: Some("See Offers".to_string()),
                    button_url: Some("/special-offers".to_string()),
                    image_path: "/static/images/hero/hero-offers.svg".to_string(),
                    image_alt: "Discounted pantry goods on a shelf".to_string(),
                },
                HeroSlide {
                    title: Some("From Local Farms".to_string()),
                    subtitle: Some(
                        "Olive oil, dates, and dairy sourced from farms in the Jordan Valley.".to_string(),
                    ),
                    button_text: Some("Browse the Range".to_string()),
                    button_url: Some("/products".to_string()),
                    image_path: "/static/images/hero/hero-farm.svg".to_string(),
                    image_alt: "Olive grove at sunrise".to_string(),
                },
            ],
            autoplay_ms: Some(5000),
        }
    }
}

// =============================================================================
// Home Page
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Hero carousel configuration.
    pub hero: HeroConfig,
    /// Featured products for the grid.
    pub products: Vec<ProductView>,
    /// Whether the catalog could not be reached.
    pub unavailable: bool,
    pub current_user: Option<String>,
}

/// Number of products featured on the home page.
const FEATURED_PRODUCTS: usize = 8;

/// Display the home page.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> impl IntoResponse {
    let (products, unavailable) = match state.catalog().products().await {
        Ok(products) => {
            let views = products
                .iter()
                .take(FEATURED_PRODUCTS)
                .map(ProductView::from)
                .collect();
            (views, false)
        }
        Err(e) => {
            tracing::error!("Failed to fetch products for home page: {e}");
            (Vec::new(), true)
        }
    };

    HomeTemplate {
        hero: HeroConfig::default(),
        products,
        unavailable,
        current_user: user.map(|u| u.display_name().to_string()),
    }
}
