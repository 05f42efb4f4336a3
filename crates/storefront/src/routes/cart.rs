//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Mutations require a signed-in user via [`RequireAuth`]; the cart itself
//! lives in the process-wide [`CartStore`](crate::services::CartStore).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use cedar_market_core::{Cart, CartEvent, LineItem, OfferId, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{self, AppError};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub name: String,
    pub quantity: u32,
    pub stock: u32,
    pub at_max: bool,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.id.as_i64(),
            name: line.name.clone(),
            quantity: line.quantity,
            stock: line.stock,
            at_max: line.quantity >= line.stock,
            price: line.price.display(),
            line_total: line.line_total().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
///
/// Exactly one of `product_id` or `offer_id` is expected; an offer add is
/// keyed by the offer's underlying product at the discounted price.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: Option<i64>,
    pub offer_id: Option<i64>,
    pub quantity: Option<u32>,
}

/// Update cart form data (wholesale line replacement from the quick view).
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: u32,
}

/// Quantity stepper form data.
#[derive(Debug, Deserialize)]
pub struct SetQuantityForm {
    pub product_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

/// Order submission form data.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    pub phone: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub current_user: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Order result fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_result.html")]
pub struct OrderResultTemplate {
    pub success: bool,
    pub message: String,
}

/// `HX-Trigger` payload that refreshes the count badge and shows a toast.
fn cart_trigger(message: &str) -> String {
    serde_json::json!({
        "cart-updated": null,
        "cart-toast": { "message": message },
    })
    .to_string()
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let user = state.sessions().current().await;
    let cart = CartView::from(&state.cart().snapshot().await);

    CartShowTemplate {
        cart,
        current_user: user.map(|u| u.display_name().to_string()),
    }
}

/// Add item to cart (HTMX).
///
/// Resolves the product (or offer) against the catalog so the cart line
/// carries the current name, price, and stock. Returns the count badge
/// with an HTMX trigger to refresh other cart elements.
#[instrument(skip(state, _user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1);

    let item = if let Some(offer_id) = form.offer_id {
        match state.catalog().find_offer(OfferId::new(offer_id)).await {
            Ok(Some(offer)) => offer.to_line_item(quantity),
            Ok(None) => return unavailable_fragment(),
            Err(e) => {
                tracing::error!("Failed to load offer for cart: {e}");
                return catalog_down_fragment();
            }
        }
    } else if let Some(product_id) = form.product_id {
        match state
            .catalog()
            .find_product(ProductId::new(product_id))
            .await
        {
            Ok(Some(product)) => product.to_line_item(quantity),
            Ok(None) => return unavailable_fragment(),
            Err(e) => {
                tracing::error!("Failed to load product for cart: {e}");
                return catalog_down_fragment();
            }
        }
    } else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<span class=\"cart-error\">Nothing to add</span>"),
        )
            .into_response();
    };

    let product_id = item.id.to_string();
    match state.cart().add(item).await {
        Ok(event) => {
            error::add_breadcrumb(
                "cart",
                "Added product to cart",
                Some(&[("product_id", product_id.as_str())]),
            );
            let message = match event {
                CartEvent::Added => "Added to cart",
                CartEvent::QuantityUpdated => "Cart quantity updated",
            };
            let count = state.cart().item_count().await;
            (
                AppendHeaders([("HX-Trigger", cart_trigger(message))]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Replace a cart line wholesale (HTMX, from the quick view).
///
/// The line is rebuilt from the catalog with the submitted quantity, so a
/// stale name or price in the cart gets refreshed along the way.
#[instrument(skip(state, _user))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let product = match state
        .catalog()
        .find_product(ProductId::new(form.product_id))
        .await
    {
        Ok(Some(product)) => product,
        Ok(None) => return unavailable_fragment(),
        Err(e) => {
            tracing::error!("Failed to load product for cart update: {e}");
            return catalog_down_fragment();
        }
    };

    match state.cart().update(product.to_line_item(form.quantity)).await {
        Ok(()) => {
            let count = state.cart().item_count().await;
            (
                AppendHeaders([("HX-Trigger", cart_trigger("Cart updated"))]),
                CartCountTemplate { count },
            )
                .into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Step a cart line's quantity (HTMX).
///
/// Out-of-range quantities are silently rejected: the fragment re-renders
/// with the unchanged cart and no trigger fires.
#[instrument(skip(state, _user))]
pub async fn set_quantity(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<SetQuantityForm>,
) -> Response {
    match state
        .cart()
        .set_quantity(ProductId::new(form.product_id), form.quantity)
        .await
    {
        Ok(applied) => {
            let cart = CartView::from(&state.cart().snapshot().await);
            if applied {
                (
                    AppendHeaders([("HX-Trigger", "cart-updated")]),
                    CartItemsTemplate { cart },
                )
                    .into_response()
            } else {
                CartItemsTemplate { cart }.into_response()
            }
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, _user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    match state.cart().remove(ProductId::new(form.product_id)).await {
        Ok(()) => {
            let cart = CartView::from(&state.cart().snapshot().await);
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartItemsTemplate { cart },
            )
                .into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    CartCountTemplate {
        count: state.cart().item_count().await,
    }
}

/// Submit the order (HTMX).
///
/// Validates the phone number, posts the cart to the catalog API, and
/// renders the outcome as a fragment. The cart is left intact either way;
/// a failed submission can simply be retried.
#[instrument(skip(state, user, form))]
pub async fn order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<OrderForm>,
) -> impl IntoResponse {
    use crate::catalog::{OrderRequest, OrderUser};

    let phone = form.phone.trim();
    if phone.is_empty() || !phone.chars().all(|c| c.is_ascii_digit()) {
        return OrderResultTemplate {
            success: false,
            message: "Please enter a valid phone number (digits only).".to_string(),
        };
    }

    let items = state.cart().items().await;
    if items.is_empty() {
        return OrderResultTemplate {
            success: false,
            message: "Your cart is empty.".to_string(),
        };
    }

    let request = OrderRequest {
        user: OrderUser {
            name: user.display_name(),
            email: &user.email,
            phone,
        },
        items: &items,
    };

    match state.catalog().submit_order(&request).await {
        Ok(()) => {
            error::add_breadcrumb("cart", "Order submitted", None);
            OrderResultTemplate {
                success: true,
                message: "Order sent! We will contact you shortly to confirm delivery."
                    .to_string(),
            }
        }
        Err(e) => {
            tracing::error!("Order submission failed: {e}");
            sentry::capture_error(&e);
            OrderResultTemplate {
                success: false,
                message: "Your order could not be sent. Please try again.".to_string(),
            }
        }
    }
}

fn unavailable_fragment() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html("<span class=\"cart-error\">This item is no longer available</span>"),
    )
        .into_response()
}

fn catalog_down_fragment() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html("<span class=\"cart-error\">The catalog is temporarily unavailable</span>"),
    )
        .into_response()
}
