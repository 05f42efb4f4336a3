//! Integration tests for Cedar Market.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cedar-market-integration-tests
//! ```
//!
//! Each test spins up a mock catalog API and a real storefront router on
//! ephemeral ports, with cart and session snapshots in a fresh temp
//! directory. Nothing external is required.
//!
//! The mock catalog serves a small fixed inventory (see
//! [`mock_catalog_router`]) and accepts any registration; logins succeed
//! only with [`GOOD_PASSWORD`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tempfile::TempDir;
use uuid::Uuid;

use cedar_market_storefront::app;
use cedar_market_storefront::config::StorefrontConfig;
use cedar_market_storefront::state::AppState;

/// The only password the mock catalog's login endpoint accepts.
pub const GOOD_PASSWORD: &str = "secret123";

/// An email the mock catalog's register endpoint always rejects as taken.
pub const TAKEN_EMAIL: &str = "taken@example.com";

// =============================================================================
// Mock Catalog API
// =============================================================================

fn mock_products() -> Value {
    json!([
        {
            "id": 1,
            "name": "Olive Oil 1L",
            "description": "Cold-pressed extra virgin olive oil",
            "price": 8.0,
            "stock": 5,
            "category_name": "Pantry",
            "manufacturer": "Jordan Valley Farms",
            "weight": 1.0,
        },
        {
            "id": 2,
            "name": "Medjool Dates",
            "description": "Soft premium dates",
            "price": "3.25",
            "stock": 4,
            "category_name": "Dried Fruit",
            "weight": 0.5,
        },
        { "id": 3, "name": "Halloumi", "price": 5.0, "stock": 0 },
        // A row without an id must be dropped by the storefront
        { "name": "No Id Row", "price": 1.0, "stock": 9 },
    ])
}

fn mock_offers() -> Value {
    json!([
        {
            "id": 1,
            "product_id": 1,
            "name": "Olive Oil 1L",
            "original_price": 8.0,
            "discounted_price": 6.0,
            "discount_percentage": 25,
            "time_left": "2 days",
            "stock": 3,
        },
    ])
}

async fn mock_register(Json(body): Json<Value>) -> Response {
    if body["email"].as_str() == Some(TAKEN_EMAIL) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "User already exists" })),
        )
            .into_response();
    }

    Json(json!({
        "token": "test-token",
        "user": { "full_name": body["name"], "email": body["email"] },
    }))
    .into_response()
}

async fn mock_login(Json(body): Json<Value>) -> Response {
    if body["password"].as_str() == Some(GOOD_PASSWORD) {
        Json(json!({
            "token": "test-token",
            "user": { "name": "Test Shopper", "email": body["email"] },
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response()
    }
}

/// A stand-in for the catalog API with a small fixed inventory.
#[must_use]
pub fn mock_catalog_router() -> Router {
    Router::new()
        .route("/products", get(|| async { Json(mock_products()) }))
        .route("/offers", get(|| async { Json(mock_offers()) }))
        .route("/auth/register", post(mock_register))
        .route("/auth/login", post(mock_login))
        .route(
            "/orders/email",
            post(|| async { Json(json!({ "status": "ok" })) }),
        )
}

// =============================================================================
// Test Context
// =============================================================================

/// A storefront under test, wired to a mock catalog.
///
/// Dropping the context tears down the temp data directory; the spawned
/// servers die with the test runtime.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    pub catalog_url: String,
    config: StorefrontConfig,
    _data_dir: TempDir,
}

impl TestContext {
    /// Start a mock catalog and a storefront wired to it.
    pub async fn spawn() -> Self {
        let catalog_url = serve(mock_catalog_router()).await;
        Self::spawn_with_catalog(&catalog_url).await
    }

    /// Start a storefront pointed at the given catalog base URL.
    ///
    /// Pass an unreachable URL to simulate a catalog outage.
    pub async fn spawn_with_catalog(catalog_url: &str) -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            data_dir: data_dir.path().to_path_buf(),
            catalog_api_url: catalog_url.parse().expect("parse catalog url"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let storefront_url = serve_storefront(&config).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build http client");

        Self {
            client,
            storefront_url,
            catalog_url: catalog_url.to_string(),
            config,
            _data_dir: data_dir,
        }
    }

    /// Start a fresh storefront on the same data directory.
    ///
    /// Simulates a process restart: state is rebuilt from the snapshot
    /// files, nothing carried over in memory.
    pub async fn restart(&mut self) {
        self.storefront_url = serve_storefront(&self.config).await;
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// GET a storefront path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed")
    }

    /// GET a storefront path and return the body.
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.expect("read body")
    }

    /// POST a form to a storefront path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("request failed")
    }

    /// Register a fresh account, signing the storefront in.
    ///
    /// Returns the registered email.
    pub async fn sign_in(&self) -> String {
        let email = format!("shopper-{}@example.com", Uuid::new_v4());
        let response = self
            .post_form(
                "/register",
                &[
                    ("name", "Test Shopper"),
                    ("email", &email),
                    ("password", GOOD_PASSWORD),
                ],
            )
            .await;
        assert_eq!(response.status(), 303, "registration should redirect home");
        email
    }
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    format!("http://{addr}")
}

async fn serve_storefront(config: &StorefrontConfig) -> String {
    let state = AppState::new(config.clone())
        .await
        .expect("initialize storefront state");
    serve(app::router(state)).await
}
