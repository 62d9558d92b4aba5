//! Cart line items and their catalog-joined views.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};
use super::product::Product;

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// A zero quantity means the item is not in the cart.
    #[error("quantity must be at least 1")]
    Zero,
    /// The input was below zero.
    #[error("quantity cannot be negative (got {0})")]
    Negative(i64),
    /// The input does not fit in a `u32`.
    #[error("quantity {0} is too large")]
    TooLarge(i64),
}

/// A line-item quantity, always at least one.
///
/// There is no zero quantity: an item whose count would reach zero is
/// removed from the cart instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit, or `None` at `u32::MAX`.
    #[must_use]
    pub const fn increment(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// One fewer unit, or `None` when the count would reach zero.
    #[must_use]
    pub const fn decrement(self) -> Option<Self> {
        match NonZeroU32::new(self.0.get() - 1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value).map(Self).ok_or(QuantityError::Zero)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(QuantityError::Negative(value));
        }
        let value = u32::try_from(value).map_err(|_| QuantityError::TooLarge(value))?;
        Self::try_from(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A product in the cart and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog product this line refers to.
    pub id: ProductId,
    /// Number of units, never zero.
    pub quantity: Quantity,
}

impl CartItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(id: ProductId, quantity: Quantity) -> Self {
        Self { id, quantity }
    }

    /// Create a line item from an unchecked quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is zero, negative, or too large.
    pub fn try_new(id: ProductId, quantity: i64) -> Result<Self, QuantityError> {
        Ok(Self::new(id, Quantity::try_from(quantity)?))
    }
}

/// A cart item joined with its catalog product.
///
/// This is a view computed from the cart and the catalog; it is never
/// stored or persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDetail {
    /// Catalog product this line refers to.
    pub id: ProductId,
    /// Number of units.
    pub quantity: Quantity,
    /// Full product record at the time the view was computed.
    #[serde(rename = "productDetails")]
    pub product: Product,
}

impl CartDetail {
    /// Join a cart item with its product.
    #[must_use]
    pub const fn new(item: CartItem, product: Product) -> Self {
        Self {
            id: item.id,
            quantity: item.quantity,
            product,
        }
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the total does not fit.
    pub fn line_total(&self) -> Result<Price, PriceError> {
        self.product.price.times(self.quantity)
    }
}
