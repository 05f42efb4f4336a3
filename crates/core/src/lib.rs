//! Cedar Market Core - Shared types and the cart model.
//!
//! This crate provides the domain types used across the Cedar Market
//! components:
//! - `storefront` - Public-facing storefront site
//! - `cli` - Command-line tools for inspecting local state
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no storage. The storefront wraps [`cart::Cart`] with
//! session gating and persistence; the model itself is synchronous and
//! fully testable in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails
//! - [`cart`] - The ordered line-item cart and its merge/quantity rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartEvent, LineItem};
pub use types::*;
