//! Unified error handling for the cart store.
//!
//! Each concern has its own error type next to the code that raises it
//! ([`CatalogError`], [`StorageError`], [`ConfigError`]); [`CartError`]
//! wraps them for callers that want a single type.

use thiserror::Error;

use cart_core::ProductId;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::persistence::StorageError;

/// A cart item references a product that is not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("product {id} not found in catalog")]
pub struct LookupError {
    /// The unresolved product identifier.
    pub id: ProductId,
}

/// Input rejected by a cart mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The same product appears in more than one line item.
    #[error("product {id} appears more than once")]
    DuplicateProduct { id: ProductId },
}

/// Application-level error type for the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Derived view could not resolve a product.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Mutator input was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Catalog could not be built or loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::from(LookupError {
            id: ProductId::new(9),
        });
        assert_eq!(err.to_string(), "Lookup error: product 9 not found in catalog");

        let err = CartError::from(ValidationError::DuplicateProduct {
            id: ProductId::new(2),
        });
        assert_eq!(
            err.to_string(),
            "Validation error: product 2 appears more than once"
        );
    }
}
