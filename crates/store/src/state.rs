//! Cart state and its pure transitions.
//!
//! Every transition takes the current state by reference and returns the
//! next one, so the store can swap its state as a single unit and observers
//! never see a half-applied update.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use cart_core::{CartItem, ProductId, Quantity};

use crate::error::ValidationError;

/// The cart's line items and panel visibility.
///
/// Invariants: at most one item per product id, and every quantity is at
/// least one (guaranteed by [`Quantity`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in insertion order.
    #[serde(rename = "cartItems")]
    pub items: Vec<CartItem>,
    /// Whether the cart panel is showing.
    #[serde(rename = "isCartOpen")]
    pub is_open: bool,
}

impl CartState {
    /// Quantity of `id` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.item(id).map_or(0, |item| item.quantity.get())
    }

    /// The line item for `id`, if any.
    #[must_use]
    pub fn item(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Whether there are no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Same items with the panel flag set to `open`.
    #[must_use]
    pub fn with_panel_open(&self, open: bool) -> Self {
        Self {
            items: self.items.clone(),
            is_open: open,
        }
    }

    /// Replace the line items wholesale, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateProduct`] if a product id appears
    /// more than once.
    pub fn with_items(&self, items: Vec<CartItem>) -> Result<Self, ValidationError> {
        ensure_unique(&items)?;
        Ok(Self {
            items,
            is_open: self.is_open,
        })
    }

    /// One more unit of `id`, appending a new line if it is not in the cart.
    ///
    /// Returns the next state and the item's new quantity, or `None` if the
    /// line is already at the largest representable quantity.
    #[must_use]
    pub fn incremented(&self, id: ProductId) -> Option<(Self, Quantity)> {
        let mut items = self.items.clone();
        let quantity = match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.increment()?;
                item.quantity
            }
            None => {
                items.push(CartItem::new(id, Quantity::ONE));
                Quantity::ONE
            }
        };

        Some((
            Self {
                items,
                is_open: self.is_open,
            },
            quantity,
        ))
    }

    /// One fewer unit of `id`, dropping the line when it reaches zero.
    ///
    /// Returns `None` if `id` is not in the cart. Otherwise returns the next
    /// state and the remaining quantity, `None` meaning the line was removed.
    #[must_use]
    pub fn decremented(&self, id: ProductId) -> Option<(Self, Option<Quantity>)> {
        let current = self.item(id)?.quantity;
        match current.decrement() {
            Some(remaining) => {
                let items = self
                    .items
                    .iter()
                    .map(|item| {
                        if item.id == id {
                            CartItem::new(id, remaining)
                        } else {
                            *item
                        }
                    })
                    .collect();
                Some((
                    Self {
                        items,
                        is_open: self.is_open,
                    },
                    Some(remaining),
                ))
            }
            None => self.without(id).map(|next| (next, None)),
        }
    }

    /// The cart without `id`, or `None` if it was not there.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        self.item(id)?;
        Some(Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id != id)
                .copied()
                .collect(),
            is_open: self.is_open,
        })
    }

    /// No line items; the panel flag is kept.
    #[must_use]
    pub const fn cleared(&self) -> Self {
        Self {
            items: Vec::new(),
            is_open: self.is_open,
        }
    }
}

/// Check that no product id appears twice.
pub(crate) fn ensure_unique(items: &[CartItem]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    match items.iter().find(|item| !seen.insert(item.id)) {
        Some(item) => Err(ValidationError::DuplicateProduct { id: item.id }),
        None => Ok(()),
    }
}
