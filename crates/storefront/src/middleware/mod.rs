//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, performance tracing)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Authentication is not a layer here: handlers opt in via the
//! [`RequireAuth`] and [`OptionalAuth`] extractors.

pub mod auth;
pub mod request_id;

pub use auth::{AuthRejection, OptionalAuth, RequireAuth};
pub use request_id::request_id_middleware;
