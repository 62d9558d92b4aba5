//! Algebraic properties of the cart operations.
//!
//! Products 1..=5 are in the catalog; 6 is not, so sequences also exercise
//! unresolved line items.

use std::collections::HashSet;

use proptest::prelude::*;

use cart_core::{CurrencyCode, Price, ProductId};
use cart_integration_tests::{catalog, item};
use cart_store::{CartStore, Catalog, LookupError, StaticCatalog};

const CATALOG_SIZE: u32 = 5;
const UNKNOWN_ID: u32 = CATALOG_SIZE + 1;

#[derive(Debug, Clone, Copy)]
enum Op {
    Increment(u32),
    Decrement(u32),
    Remove(u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let id = 1..=UNKNOWN_ID;
    prop_oneof![
        3 => id.clone().prop_map(Op::Increment),
        2 => id.clone().prop_map(Op::Decrement),
        1 => id.prop_map(Op::Remove),
    ]
}

fn apply(store: &mut CartStore<StaticCatalog>, ops: &[Op]) {
    for op in ops {
        match *op {
            Op::Increment(id) => store.increment(ProductId::new(id)),
            Op::Decrement(id) => store.decrement(ProductId::new(id)),
            Op::Remove(id) => store.remove(ProductId::new(id)),
        }
    }
}

fn expected_subtotal(store: &CartStore<StaticCatalog>) -> Price {
    store
        .items()
        .iter()
        .filter_map(|line| {
            store
                .catalog()
                .product(line.id)
                .map(|p| p.price.times(line.quantity))
        })
        .try_fold(Price::zero(CurrencyCode::USD), |acc, line| acc.checked_add(&line?))
        .map(|total| total.rounded())
        .unwrap_or_else(|e| panic!("small single-currency catalog: {e}"))
}

proptest! {
    /// Items stay unique and every present item has a positive quantity.
    #[test]
    fn prop_items_unique_and_positive(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut store = CartStore::new(catalog(CATALOG_SIZE));
        apply(&mut store, &ops);

        let mut seen = HashSet::new();
        for line in store.items() {
            prop_assert!(seen.insert(line.id), "duplicate line for {}", line.id);
            prop_assert!(line.quantity.get() >= 1);
            prop_assert_eq!(store.quantity_of(line.id), line.quantity.get());
        }
    }

    /// `increment(p)` followed by `decrement(p)` restores the prior state.
    #[test]
    fn prop_increment_decrement_cancel(
        ops in prop::collection::vec(arb_op(), 0..40),
        id in 1..=UNKNOWN_ID,
    ) {
        let mut store = CartStore::new(catalog(CATALOG_SIZE));
        apply(&mut store, &ops);
        let before = store.state().clone();

        store.increment(ProductId::new(id));
        store.decrement(ProductId::new(id));

        prop_assert_eq!(store.state(), &before);
    }

    /// Decrementing an absent product changes nothing.
    #[test]
    fn prop_decrement_absent_is_noop(
        ops in prop::collection::vec(arb_op(), 0..40),
        id in 1..=UNKNOWN_ID,
    ) {
        let mut store = CartStore::new(catalog(CATALOG_SIZE));
        apply(&mut store, &ops);
        store.remove(ProductId::new(id));
        let before = store.state().clone();

        store.decrement(ProductId::new(id));

        prop_assert_eq!(store.state(), &before);
    }

    /// The subtotal is the sum of unit price times quantity over resolvable
    /// lines, no matter how the cart was reached.
    #[test]
    fn prop_subtotal_matches_line_sum(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut store = CartStore::new(catalog(CATALOG_SIZE));
        apply(&mut store, &ops);

        prop_assert_eq!(store.subtotal(), Ok(expected_subtotal(&store)));
        // Memoized value agrees with a second read.
        prop_assert_eq!(store.subtotal(), Ok(expected_subtotal(&store)));
    }

    /// Details cover every line when all resolve and fail as a whole
    /// otherwise.
    #[test]
    fn prop_details_all_or_nothing(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut store = CartStore::new(catalog(CATALOG_SIZE));
        apply(&mut store, &ops);

        let first_unknown = store
            .items()
            .iter()
            .find(|line| store.catalog().product(line.id).is_none())
            .map(|line| line.id);

        match (store.details(), first_unknown) {
            (Ok(details), None) => {
                prop_assert_eq!(details.len(), store.items().len());
                for (detail, line) in details.iter().zip(store.items()) {
                    prop_assert_eq!(detail.id, line.id);
                    prop_assert_eq!(detail.quantity, line.quantity);
                }
            }
            (Err(LookupError { id }), Some(expected)) => prop_assert_eq!(id, expected),
            (result, expected) => {
                prop_assert!(false, "details {:?} but first unknown {:?}", result, expected);
            }
        }
    }

    /// `replace_items(X)` reads back as X.
    #[test]
    fn prop_replace_items_roundtrip(
        lines in prop::collection::btree_map(1..=UNKNOWN_ID, 1..=20_i64, 0..6),
    ) {
        let items: Vec<_> = lines.into_iter().map(|(id, q)| item(id, q)).collect();
        let mut store = CartStore::new(catalog(CATALOG_SIZE));
        store.increment(ProductId::new(1));

        prop_assert!(store.replace_items(items.clone()).is_ok());
        prop_assert_eq!(store.items(), items.as_slice());
    }
}

#[test]
fn test_example_subtotal() {
    let catalog = StaticCatalog::new(vec![
        cart_integration_tests::product(1, "$10.00"),
        cart_integration_tests::product(2, "$5.50"),
    ])
    .unwrap_or_else(|e| panic!("{e}"));
    let mut store = CartStore::new(catalog);

    store.increment(ProductId::new(1));
    store.increment(ProductId::new(1));
    store.increment(ProductId::new(2));

    assert_eq!(store.quantity_of(ProductId::new(1)), 2);
    assert_eq!(store.quantity_of(ProductId::new(2)), 1);
    assert_eq!(store.subtotal(), Ok(Price::from_cents(2550, CurrencyCode::USD)));
}

#[test]
fn test_example_decrement_removes_last_unit() {
    let mut store = CartStore::new(catalog(CATALOG_SIZE));
    store.increment(ProductId::new(1));
    store.decrement(ProductId::new(1));
    assert_eq!(store.quantity_of(ProductId::new(1)), 0);
    assert!(store.items().is_empty());
}
