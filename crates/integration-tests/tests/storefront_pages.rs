//! Integration tests for the storefront's public pages.
//!
//! These drive the real router over HTTP against the mock catalog and
//! assert on the rendered HTML.

use cedar_market_integration_tests::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::spawn().await;

    let response = ctx.get("/health").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_home_page_lists_products() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/").await;
    assert!(body.contains("Olive Oil 1L"));
    assert!(body.contains("8.00 JD"));
}

#[tokio::test]
async fn test_products_page_drops_rows_without_id() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/products").await;
    assert!(body.contains("Olive Oil 1L"));
    assert!(body.contains("Medjool Dates"));
    assert!(
        !body.contains("No Id Row"),
        "rows without an id must not render"
    );
}

#[tokio::test]
async fn test_products_search_filters_by_name() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/products?search=dates").await;
    assert!(body.contains("Medjool Dates"));
    assert!(!body.contains("Olive Oil 1L"));
}

#[tokio::test]
async fn test_out_of_stock_product_cannot_be_added() {
    let ctx = TestContext::spawn().await;

    // Halloumi has stock 0 in the mock inventory
    let body = ctx.get_text("/products?search=halloumi").await;
    assert!(body.contains("Out of Stock"));
    assert!(!body.contains("Add to Cart"));
}

#[tokio::test]
async fn test_suggestions_fragment() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/products/suggest?search=oli").await;
    assert!(body.contains("Olive Oil 1L"));
    assert!(body.contains("/products?search=Olive%20Oil%201L"));
}

#[tokio::test]
async fn test_suggestions_empty_for_blank_query() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/products/suggest?search=%20").await;
    assert!(!body.contains("<li>"));
}

#[tokio::test]
async fn test_quick_view_fragment() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/products/1/quick-view").await;
    assert!(body.contains("Olive Oil 1L"));
    assert!(body.contains("Add to Cart"));
    assert!(body.contains("Jordan Valley Farms"));
}

#[tokio::test]
async fn test_quick_view_unknown_product_is_404() {
    let ctx = TestContext::spawn().await;

    let response = ctx.get("/products/999/quick-view").await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_special_offers_page() {
    let ctx = TestContext::spawn().await;

    let body = ctx.get_text("/special-offers").await;
    assert!(body.contains("25% OFF"));
    assert!(body.contains("6.00 JD"), "discounted price should render");
    assert!(body.contains("8.00 JD"), "original price should render");
    assert!(body.contains("2 days"));
}

#[tokio::test]
async fn test_catalog_outage_degrades_listing() {
    // Port 9 (discard) refuses connections immediately
    let ctx = TestContext::spawn_with_catalog("http://127.0.0.1:9").await;

    let response = ctx.get("/products").await;
    assert_eq!(response.status(), 200, "outage must not produce an error page");
    let body = response.text().await.expect("body");
    assert!(body.contains("Failed to load products"));

    let home = ctx.get_text("/").await;
    assert!(home.contains("temporarily unavailable"));
}
