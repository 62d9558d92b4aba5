//! The cart store.
//!
//! A [`CartStore`] owns the cart state, its catalog, and optionally a
//! persistence adapter. Mutators are synchronous: when one returns, the new
//! state is in place, persisted, and every observer has seen it.
//!
//! # Derived views
//!
//! [`CartStore::details`] and [`CartStore::subtotal`] are memoized. The
//! cache is keyed by the items revision (bumped on every items mutation),
//! a catalog epoch (bumped by [`CartStore::replace_catalog`]) and the
//! catalog's own [`Catalog::revision`], so a stale view is never served.

use std::cell::RefCell;

use tracing::{info, instrument};
use uuid::Uuid;

use cart_core::{CartDetail, CartItem, Price, PriceError, ProductId};

use crate::catalog::Catalog;
use crate::error::{LookupError, ValidationError};
use crate::events::{CartEvent, CartObserver, Observers, StateChange, SubscriptionId};
use crate::persistence::{CartPersistence, MemoryStorage, SessionStorage};
use crate::state::CartState;

/// Identifies the inputs a derived view was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    items_revision: u64,
    catalog_epoch: u64,
    catalog_revision: u64,
}

#[derive(Debug, Default)]
struct DerivedViews {
    key: Option<CacheKey>,
    details: Option<Result<Vec<CartDetail>, LookupError>>,
    subtotal: Option<Result<Price, PriceError>>,
}

impl DerivedViews {
    /// Drop cached views computed from different inputs.
    fn validate(&mut self, key: CacheKey) {
        if self.key != Some(key) {
            *self = Self {
                key: Some(key),
                ..Self::default()
            };
        }
    }
}

/// Observable shopping-cart state container.
#[derive(Debug)]
pub struct CartStore<C, S = MemoryStorage> {
    session_id: Uuid,
    state: CartState,
    catalog: C,
    catalog_epoch: u64,
    persistence: Option<CartPersistence<S>>,
    observers: Observers,
    sequence: u64,
    items_revision: u64,
    derived: RefCell<DerivedViews>,
}

impl<C: Catalog> CartStore<C, MemoryStorage> {
    /// Create an empty, in-memory store.
    pub fn new(catalog: C) -> Self {
        Self::build(catalog, None, CartState::default())
    }
}

impl<C: Catalog, S: SessionStorage> CartStore<C, S> {
    /// Create a store that restores its items from `persistence` and writes
    /// them back after every items mutation.
    ///
    /// Absent or malformed persisted data yields an empty cart.
    pub fn with_persistence(catalog: C, persistence: CartPersistence<S>) -> Self {
        let state = CartState {
            items: persistence.restore(),
            is_open: false,
        };
        Self::build(catalog, Some(persistence), state)
    }

    fn build(catalog: C, persistence: Option<CartPersistence<S>>, state: CartState) -> Self {
        let store = Self {
            session_id: Uuid::new_v4(),
            state,
            catalog,
            catalog_epoch: 0,
            persistence,
            observers: Observers::default(),
            sequence: 0,
            items_revision: 0,
            derived: RefCell::new(DerivedViews::default()),
        };
        info!(
            session = %store.session_id,
            items = store.state.items.len(),
            persisted = store.persistence.is_some(),
            "Cart store created"
        );
        store
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Identifier of this store instance, attached to its log spans.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The current line items.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Quantity of `id` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.state.quantity_of(id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    /// The catalog backing the derived views.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Mutable access to the catalog.
    ///
    /// Changes are picked up through [`Catalog::revision`].
    pub const fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// The persistence adapter, if any.
    #[must_use]
    pub const fn persistence(&self) -> Option<&CartPersistence<S>> {
        self.persistence.as_ref()
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Register an observer; it sees every later state change.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionId {
        self.observers.subscribe(Box::new(observer))
    }

    /// Remove an observer. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Open or close the cart panel.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn set_panel_open(&mut self, open: bool) {
        if self.state.is_open == open {
            return;
        }
        let next = self.state.with_panel_open(open);
        self.commit(next, CartEvent::PanelToggled { open });
    }

    /// Replace the whole item collection, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateProduct`] if a product id appears
    /// more than once; the cart is left unchanged.
    #[instrument(level = "debug", skip(self, items), fields(session = %self.session_id, count = items.len()))]
    pub fn replace_items(&mut self, items: Vec<CartItem>) -> Result<(), ValidationError> {
        let count = items.len();
        let next = self.state.with_items(items)?;
        self.commit(next, CartEvent::ItemsReplaced { count });
        Ok(())
    }

    /// Add one unit of `id`, inserting it with quantity one if absent.
    ///
    /// No-op if the line is already at `u32::MAX` units.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn increment(&mut self, id: ProductId) {
        let Some((next, quantity)) = self.state.incremented(id) else {
            return;
        };
        let event = if quantity.get() == 1 {
            CartEvent::ItemAdded { id }
        } else {
            CartEvent::QuantityChanged { id, quantity }
        };
        self.commit(next, event);
    }

    /// Remove one unit of `id`, dropping the line at quantity one.
    ///
    /// No-op if `id` is not in the cart.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn decrement(&mut self, id: ProductId) {
        let Some((next, remaining)) = self.state.decremented(id) else {
            return;
        };
        let event = match remaining {
            Some(quantity) => CartEvent::QuantityChanged { id, quantity },
            None => CartEvent::ItemRemoved { id },
        };
        self.commit(next, event);
    }

    /// Drop the line for `id`. No-op if absent.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn remove(&mut self, id: ProductId) {
        if let Some(next) = self.state.without(id) {
            self.commit(next, CartEvent::ItemRemoved { id });
        }
    }

    /// Remove every line; the panel flag is untouched.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn clear(&mut self) {
        if self.state.is_empty() {
            return;
        }
        let next = self.state.cleared();
        self.commit(next, CartEvent::Cleared);
    }

    /// Swap the catalog; derived views are recomputed on next access.
    #[instrument(level = "debug", skip(self, catalog), fields(session = %self.session_id))]
    pub fn replace_catalog(&mut self, catalog: C) -> C {
        let previous = std::mem::replace(&mut self.catalog, catalog);
        self.catalog_epoch += 1;
        let revision = self.catalog.revision();
        let next = self.state.clone();
        self.commit(next, CartEvent::CatalogReplaced { revision });
        previous
    }

    /// Reload items from session storage, e.g. after another writer
    /// updated it. Returns the number of restored lines.
    ///
    /// Without a persistence adapter this is a no-op returning zero.
    #[instrument(level = "debug", skip(self), fields(session = %self.session_id))]
    pub fn rehydrate(&mut self) -> usize {
        let Some(persistence) = self.persistence.as_ref() else {
            return 0;
        };
        let items = persistence.restore();
        let count = items.len();
        if items != self.state.items {
            let next = CartState {
                items,
                is_open: self.state.is_open,
            };
            self.state = next;
            self.items_revision += 1;
            self.notify(CartEvent::Restored { count });
        }
        count
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Each line item joined with its catalog product, in cart order.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] for the first item whose product is not in
    /// the catalog. No partial result is returned.
    pub fn details(&self) -> Result<Vec<CartDetail>, LookupError> {
        let mut derived = self.derived.borrow_mut();
        derived.validate(self.cache_key());
        derived
            .details
            .get_or_insert_with(|| compute_details(&self.state.items, &self.catalog))
            .clone()
    }

    /// Sum of unit price times quantity over resolvable items, rounded to
    /// two fractional digits, in the catalog's currency.
    ///
    /// Items whose product is not in the catalog are left out.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if a line total or the sum does not
    /// fit in a decimal amount.
    pub fn subtotal(&self) -> Result<Price, PriceError> {
        let mut derived = self.derived.borrow_mut();
        derived.validate(self.cache_key());
        derived
            .subtotal
            .get_or_insert_with(|| compute_subtotal(&self.state.items, &self.catalog))
            .clone()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn cache_key(&self) -> CacheKey {
        CacheKey {
            items_revision: self.items_revision,
            catalog_epoch: self.catalog_epoch,
            catalog_revision: self.catalog.revision(),
        }
    }

    /// Install `next` as the state, persist items if they changed, and
    /// notify observers.
    fn commit(&mut self, next: CartState, event: CartEvent) {
        let items_changed = next.items != self.state.items;
        self.state = next;

        if items_changed {
            self.items_revision += 1;
            if let Some(persistence) = self.persistence.as_mut() {
                persistence.persist(&self.state.items);
            }
        }

        self.notify(event);
    }

    fn notify(&mut self, event: CartEvent) {
        self.sequence += 1;
        let change = StateChange::new(self.sequence, event);
        self.observers.notify(&change, &self.state);
    }
}

fn compute_details<C: Catalog>(
    items: &[CartItem],
    catalog: &C,
) -> Result<Vec<CartDetail>, LookupError> {
    items
        .iter()
        .map(|item| {
            catalog
                .product(item.id)
                .map(|product| CartDetail::new(*item, product.clone()))
                .ok_or(LookupError { id: item.id })
        })
        .collect()
}

fn compute_subtotal<C: Catalog>(items: &[CartItem], catalog: &C) -> Result<Price, PriceError> {
    let currency = catalog.currency();
    items
        .iter()
        .filter_map(|item| {
            catalog
                .product(item.id)
                .filter(|product| product.price.currency_code == currency)
                .map(|product| product.price.times(item.quantity))
        })
        .try_fold(Price::zero(currency), |total, line| total.checked_add(&line?))
        .map(|total| total.rounded())
}
