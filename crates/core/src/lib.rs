//! Cart Core - Shared types library.
//!
//! This crate provides the types used across all cart components:
//! - `cart-store` - The observable cart state container
//! - `cart-cli` - Command-line driver for inspecting and mutating a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! observers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities,
//!   catalog products and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
