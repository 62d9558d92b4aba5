//! Cart Store - Observable shopping-cart state container.
//!
//! The store owns the cart's line items and the "cart panel open" flag,
//! exposes synchronous mutators to a rendering layer, computes catalog-joined
//! views on demand, and optionally mirrors the line items into a
//! session-scoped key-value store.
//!
//! # Architecture
//!
//! - [`CartStore`] is explicitly constructed with its [`Catalog`] and an
//!   optional [`CartPersistence`]; there is no process-wide instance.
//! - Every mutation replaces the [`CartState`] as one unit and then notifies
//!   observers synchronously with a [`StateChange`].
//! - Derived views ([`CartStore::details`], [`CartStore::subtotal`]) are
//!   memoized and invalidated on every items mutation and catalog change.
//!
//! # Modules
//!
//! - [`catalog`] - Read-only product lookup
//! - [`state`] - Cart state and its pure transitions
//! - [`events`] - State-change events and observer registry
//! - [`persistence`] - Session storage adapters
//! - [`store`] - The cart store
//! - [`config`] - Environment-based configuration
//! - [`error`] - Error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod persistence;
pub mod state;
pub mod store;

pub use catalog::{Catalog, CatalogError, StaticCatalog};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, LookupError, Result, ValidationError};
pub use events::{CartEvent, CartObserver, StateChange, SubscriptionId, tracing_observer};
pub use persistence::{
    CartPersistence, DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, SessionStorage,
    StorageError,
};
pub use state::CartState;
pub use store::CartStore;
