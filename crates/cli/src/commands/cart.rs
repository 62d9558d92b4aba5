//! Cart inspection and editing commands.

use tracing::{info, warn};

use cart_core::{CartItem, ProductId};
use cart_store::ValidationError;

use super::FileCartStore;

/// Parse a `<id>=<quantity>` argument.
///
/// # Errors
///
/// Returns a message if the argument is malformed or the quantity is not
/// positive.
pub fn parse_item(s: &str) -> Result<CartItem, String> {
    let (id, quantity) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <id>=<quantity>, got '{s}'"))?;
    let id: ProductId = id
        .parse()
        .map_err(|e| format!("invalid product id '{id}': {e}"))?;
    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|e| format!("invalid quantity '{quantity}': {e}"))?;
    CartItem::try_new(id, quantity).map_err(|e| e.to_string())
}

/// Show line items and the subtotal.
///
/// Products missing from the catalog are reported rather than hidden.
pub fn show(store: &FileCartStore) {
    if store.items().is_empty() {
        info!("Cart is empty");
        return;
    }

    match store.details() {
        Ok(details) => {
            info!("Cart ({} items)", store.item_count());
            info!("========================");
            for detail in &details {
                match detail.line_total() {
                    Ok(total) => info!(
                        "  #{} {} x{} @ {} = {}",
                        detail.id,
                        detail.product.name,
                        detail.quantity,
                        detail.product.price,
                        total
                    ),
                    Err(e) => warn!(
                        "  #{} {} x{} @ {}: {e}",
                        detail.id,
                        detail.product.name,
                        detail.quantity,
                        detail.product.price
                    ),
                }
            }
        }
        Err(e) => {
            warn!("Cart references a product that is no longer available: {e}");
            for item in store.items() {
                info!("  #{} x{}", item.id, item.quantity);
            }
        }
    }

    match store.subtotal() {
        Ok(subtotal) => info!("Subtotal: {subtotal}"),
        Err(e) => warn!("Subtotal unavailable: {e}"),
    }
}

/// Add one unit of `id`.
pub fn add(store: &mut FileCartStore, id: ProductId) {
    let before = store.quantity_of(id);
    store.increment(id);
    let quantity = store.quantity_of(id);
    if quantity == before {
        warn!(product = %id, quantity, "Quantity is at its maximum");
        return;
    }
    info!(product = %id, quantity, "Added to cart");
}

/// Remove one unit of `id`.
pub fn remove_one(store: &mut FileCartStore, id: ProductId) {
    if store.quantity_of(id) == 0 {
        info!(product = %id, "Product is not in the cart");
        return;
    }
    store.decrement(id);
    info!(product = %id, quantity = store.quantity_of(id), "Removed one from cart");
}

/// Remove `id` entirely.
pub fn remove(store: &mut FileCartStore, id: ProductId) {
    store.remove(id);
    info!(product = %id, "Removed from cart");
}

/// Remove every line item.
pub fn clear(store: &mut FileCartStore) {
    store.clear();
    info!("Cart cleared");
}

/// Print the quantity of `id`.
pub fn quantity(store: &FileCartStore, id: ProductId) {
    info!("{}", store.quantity_of(id));
}

/// Replace all line items.
///
/// # Errors
///
/// Returns an error if a product id is listed twice.
pub fn set(store: &mut FileCartStore, items: Vec<CartItem>) -> Result<(), ValidationError> {
    store.replace_items(items)?;
    match store.subtotal() {
        Ok(subtotal) => info!(lines = store.items().len(), %subtotal, "Cart replaced"),
        Err(e) => warn!(lines = store.items().len(), error = %e, "Cart replaced"),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::open_store;
    use crate::commands::tests::config_in;

    #[test]
    fn test_parse_item() {
        let item = parse_item("3=2").unwrap();
        assert_eq!(item.id, ProductId::new(3));
        assert_eq!(item.quantity.get(), 2);

        assert!(parse_item("3").is_err());
        assert!(parse_item("x=1").is_err());
        assert!(parse_item("3=0").is_err());
        assert!(parse_item("3=-1").is_err());
    }

    #[test]
    fn test_edit_flow() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut store = open_store(&config).unwrap();

        add(&mut store, ProductId::new(1));
        add(&mut store, ProductId::new(1));
        add(&mut store, ProductId::new(2));
        assert_eq!(store.subtotal().unwrap().to_string(), "$25.50");

        remove_one(&mut store, ProductId::new(2));
        remove_one(&mut store, ProductId::new(2));
        assert_eq!(store.quantity_of(ProductId::new(2)), 0);

        let items = vec![parse_item("1=1").unwrap(), parse_item("1=2").unwrap()];
        assert!(set(&mut store, items).is_err());
        assert_eq!(store.quantity_of(ProductId::new(1)), 2);

        clear(&mut store);
        assert!(store.items().is_empty());
        show(&store);
    }

    #[test]
    fn test_add_at_maximum_quantity_keeps_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut store = open_store(&config).unwrap();

        set(&mut store, vec![parse_item("1=4294967295").unwrap()]).unwrap();
        add(&mut store, ProductId::new(1));
        assert_eq!(store.quantity_of(ProductId::new(1)), u32::MAX);

        remove_one(&mut store, ProductId::new(1));
        assert_eq!(store.quantity_of(ProductId::new(1)), u32::MAX - 1);
        show(&store);
    }
}
