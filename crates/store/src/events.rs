//! State-change events and the observer registry.
//!
//! The store never logs inline. Each state replacement produces a
//! [`StateChange`] that is handed to every subscribed [`CartObserver`];
//! logging is just one such observer ([`tracing_observer`]).

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use cart_core::{ProductId, Quantity, define_id};

use crate::state::CartState;

define_id!(SubscriptionId);

/// What happened to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    /// The cart panel was opened or closed.
    PanelToggled { open: bool },
    /// The whole item collection was replaced.
    ItemsReplaced { count: usize },
    /// A product was added with quantity one.
    ItemAdded { id: ProductId },
    /// An existing line's quantity changed.
    QuantityChanged { id: ProductId, quantity: Quantity },
    /// A line was removed.
    ItemRemoved { id: ProductId },
    /// All lines were removed.
    Cleared,
    /// Items were reloaded from session storage.
    Restored { count: usize },
    /// The catalog backing the derived views was swapped.
    CatalogReplaced { revision: u64 },
}

impl CartEvent {
    /// Short name used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PanelToggled { .. } => "panel_toggled",
            Self::ItemsReplaced { .. } => "items_replaced",
            Self::ItemAdded { .. } => "item_added",
            Self::QuantityChanged { .. } => "quantity_changed",
            Self::ItemRemoved { .. } => "item_removed",
            Self::Cleared => "cleared",
            Self::Restored { .. } => "restored",
            Self::CatalogReplaced { .. } => "catalog_replaced",
        }
    }
}

/// Envelope delivered to observers after each state replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChange {
    /// Starts at 1 and increases by one per delivered change.
    pub sequence: u64,
    /// When the change was committed.
    pub at: DateTime<Utc>,
    pub event: CartEvent,
}

impl StateChange {
    pub(crate) fn new(sequence: u64, event: CartEvent) -> Self {
        Self {
            sequence,
            at: Utc::now(),
            event,
        }
    }
}

/// Receives every state change, synchronously, after it is applied.
///
/// Implemented for any `FnMut(&StateChange, &CartState)` closure.
pub trait CartObserver {
    fn on_change(&mut self, change: &StateChange, state: &CartState);
}

impl<F> CartObserver for F
where
    F: FnMut(&StateChange, &CartState),
{
    fn on_change(&mut self, change: &StateChange, state: &CartState) {
        self(change, state);
    }
}

/// Subscribed observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u32,
    entries: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn CartObserver>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId::new(self.next_id);
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, change: &StateChange, state: &CartState) {
        for (_, observer) in &mut self.entries {
            observer.on_change(change, state);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// An observer that logs every change through `tracing` at debug level.
#[must_use]
pub fn tracing_observer() -> impl CartObserver + 'static {
    |change: &StateChange, state: &CartState| {
        debug!(
            sequence = change.sequence,
            event = change.event.kind(),
            detail = ?change.event,
            items = state.items.len(),
            units = state.item_count(),
            open = state.is_open,
            "Cart state changed"
        );
    }
}
