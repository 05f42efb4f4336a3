//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page
//! GET  /health                   - Health check
//!
//! # Products
//! GET  /products                 - Product listing (?search= filters by name)
//! GET  /products/suggest         - Search suggestions fragment (HTMX)
//! GET  /products/{id}/quick-view - Quick view fragment (HTMX)
//!
//! # Special offers
//! GET  /special-offers           - Offers listing (?search= filters by name)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                     - Cart page
//! POST /cart/add                 - Add item (returns count badge, triggers cart-updated)
//! POST /cart/update              - Replace a line wholesale (from quick view)
//! POST /cart/set-quantity        - Step a line's quantity (returns cart_items fragment)
//! POST /cart/remove              - Remove item (returns cart_items fragment)
//! POST /cart/order               - Submit the order (returns result fragment)
//! GET  /cart/count               - Cart count badge (fragment)
//!
//! # Auth
//! GET  /login                    - Login page
//! POST /login                    - Login action
//! GET  /register                 - Register page
//! POST /register                 - Register action
//! POST /logout                   - Logout action (clears session and cart)
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod offers;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/suggest", get(products::suggest))
        .route("/{id}/quick-view", get(products::quick_view))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/set-quantity", post(cart::set_quantity))
        .route("/remove", post(cart::remove))
        .route("/order", post(cart::order))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Special offers
        .route("/special-offers", get(offers::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Auth routes live at the top level (/login, /register, /logout)
        .merge(auth_routes())
}
