//! Core types for the cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{CartDetail, CartItem, Quantity, QuantityError};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{Breadcrumb, Product};
