//! Integration tests for cart mutations, persistence, and order submission.

use cedar_market_integration_tests::{TestContext, location};

#[tokio::test]
async fn test_add_without_session_redirects_to_login() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "1")])
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_add_without_session_htmx_gets_hx_redirect() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .post(ctx.url("/cart/add"))
        .header("HX-Request", "true")
        .form(&[("product_id", "1"), ("quantity", "1")])
        .send()
        .await
        .expect("request failed");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("HX-Redirect")
            .and_then(|v| v.to_str().ok()),
        Some("/login")
    );
}

#[tokio::test]
async fn test_add_merges_quantities() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "2"), ("quantity", "2")])
        .await;
    let response = ctx
        .post_form("/cart/add", &[("product_id", "2"), ("quantity", "1")])
        .await;
    assert_eq!(response.status(), 200);

    let count = ctx.get_text("/cart/count").await;
    assert_eq!(count.trim(), "3");
}

#[tokio::test]
async fn test_offer_merges_into_existing_product_line() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    // Product 1 at full price first, then the same product via its offer.
    ctx.post_form("/cart/add", &[("product_id", "1"), ("quantity", "1")])
        .await;
    ctx.post_form("/cart/add", &[("offer_id", "1"), ("quantity", "2")])
        .await;

    let count = ctx.get_text("/cart/count").await;
    assert_eq!(count.trim(), "3");

    // The line keeps the price it was first added at: 3 x 8.00, not 6.00.
    let body = ctx.get_text("/cart").await;
    assert!(body.contains("24.00 JD"));
    assert!(!body.contains("6.00 JD"));
}

#[tokio::test]
async fn test_add_unknown_product_is_rejected() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    let response = ctx
        .post_form("/cart/add", &[("product_id", "999"), ("quantity", "1")])
        .await;

    assert_eq!(response.status(), 404);
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("no longer available"));
}

#[tokio::test]
async fn test_cart_page_shows_totals() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "1"), ("quantity", "1")])
        .await;
    ctx.post_form("/cart/add", &[("product_id", "2"), ("quantity", "2")])
        .await;

    let body = ctx.get_text("/cart").await;
    assert!(body.contains("Olive Oil 1L"));
    assert!(body.contains("Medjool Dates"));
    // 1 x 8.00 + 2 x 3.25
    assert!(body.contains("14.50 JD"));
}

#[tokio::test]
async fn test_set_quantity_above_stock_is_ignored() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    // Product 2 has 4 in stock; fill the line to the limit.
    ctx.post_form("/cart/add", &[("product_id", "2"), ("quantity", "4")])
        .await;

    let response = ctx
        .post_form(
            "/cart/set-quantity",
            &[("product_id", "2"), ("quantity", "5")],
        )
        .await;

    assert_eq!(response.status(), 200);
    assert!(response.headers().get("HX-Trigger").is_none());
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("<span class=\"quantity\">4</span>"));
}

#[tokio::test]
async fn test_set_quantity_within_stock_updates() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "2"), ("quantity", "4")])
        .await;

    let response = ctx
        .post_form(
            "/cart/set-quantity",
            &[("product_id", "2"), ("quantity", "3")],
        )
        .await;

    assert_eq!(
        response
            .headers()
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok()),
        Some("cart-updated")
    );
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("<span class=\"quantity\">3</span>"));
}

#[tokio::test]
async fn test_remove_unknown_product_is_ok() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    let response = ctx
        .post_form("/cart/remove", &[("product_id", "99")])
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_remove_clears_line() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "1"), ("quantity", "1")])
        .await;

    let response = ctx
        .post_form("/cart/remove", &[("product_id", "1")])
        .await;
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Your cart is empty."));

    let count = ctx.get_text("/cart/count").await;
    assert_eq!(count.trim(), "0");
}

#[tokio::test]
async fn test_order_submission_succeeds() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "1"), ("quantity", "2")])
        .await;

    let response = ctx
        .post_form("/cart/order", &[("phone", "0791234567")])
        .await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Order sent!"));

    // The cart is left intact; a duplicate submission stays possible.
    let count = ctx.get_text("/cart/count").await;
    assert_eq!(count.trim(), "2");
}

#[tokio::test]
async fn test_order_rejects_bad_phone() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "1"), ("quantity", "1")])
        .await;

    let response = ctx.post_form("/cart/order", &[("phone", "12ab")]).await;
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("valid phone number"));
}

#[tokio::test]
async fn test_order_rejects_empty_cart() {
    let ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    let response = ctx
        .post_form("/cart/order", &[("phone", "0791234567")])
        .await;
    let body = response.text().await.expect("failed to read body");
    assert!(body.contains("Your cart is empty."));
}

#[tokio::test]
async fn test_cart_persists_across_restart() {
    let mut ctx = TestContext::spawn().await;
    ctx.sign_in().await;

    ctx.post_form("/cart/add", &[("product_id", "1"), ("quantity", "2")])
        .await;

    ctx.restart().await;

    let count = ctx.get_text("/cart/count").await;
    assert_eq!(count.trim(), "2");

    let body = ctx.get_text("/").await;
    assert!(body.contains("Test Shopper"));
}
