//! Long-lived services owned by the application state.
//!
//! # Services
//!
//! - `session` - The signed-in user, restored from and persisted to storage
//! - `cart` - The shopping cart, gated on the session and persisted to storage

pub mod cart;
pub mod session;

pub use cart::{CartError, CartStore};
pub use session::SessionService;
