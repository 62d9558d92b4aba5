//! Catalog listing.

use tracing::info;

use cart_store::{CartConfig, Catalog, Result, StaticCatalog};

/// Log every product in the configured catalog.
///
/// # Errors
///
/// Returns an error if no catalog is configured or it cannot be loaded.
pub fn list(config: &CartConfig) -> Result<()> {
    let catalog = StaticCatalog::from_path(config.require_catalog_path()?)?;

    info!("Catalog ({} products, {})", catalog.len(), catalog.currency());
    info!("========================");
    for product in catalog.products() {
        let color = if product.color.is_empty() {
            String::new()
        } else {
            format!(" ({})", product.color)
        };
        info!("  #{} {}{color} - {}", product.id, product.name, product.price);
    }

    Ok(())
}
