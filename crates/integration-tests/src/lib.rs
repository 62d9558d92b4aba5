//! Integration tests for the cart store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Algebraic properties of the cart operations (proptest)
//! - `cart_persistence` - Session storage round-trips across store instances
//!
//! This library holds the fixtures shared by those tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use cart_core::{CartItem, Price, Product, ProductId};
use cart_store::StaticCatalog;

/// A product with the given id and formatted price.
///
/// # Panics
///
/// Panics if `price` is not a valid formatted price.
#[must_use]
#[allow(clippy::expect_used)]
pub fn product(id: u32, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        color: String::new(),
        price: Price::parse(price).expect("fixture price"),
        description: String::new(),
        image_src: String::new(),
        image_alt: String::new(),
        breadcrumbs: Vec::new(),
    }
}

/// Catalog with products 1..=`count`, product `n` priced at `n` dollars and
/// 25 cents.
///
/// # Panics
///
/// Panics if `count` is zero.
#[must_use]
#[allow(clippy::expect_used)]
pub fn catalog(count: u32) -> StaticCatalog {
    assert!(count > 0, "catalog needs at least one product");
    StaticCatalog::new(
        (1..=count)
            .map(|n| product(n, &format!("${n}.25")))
            .collect(),
    )
    .expect("fixture catalog")
}

/// A line item.
///
/// # Panics
///
/// Panics if `quantity` is not positive.
#[must_use]
#[allow(clippy::expect_used)]
pub fn item(id: u32, quantity: i64) -> CartItem {
    CartItem::try_new(ProductId::new(id), quantity).expect("fixture quantity")
}
