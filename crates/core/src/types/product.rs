//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A category link shown above a product for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub id: CategoryId,
    pub name: String,
}

/// A catalog entry.
///
/// Products are owned by the catalog and never mutated by the cart. The
/// serialized shape uses camelCase keys so product data exported by the
/// storefront front-end can be loaded as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier assigned by the product data source.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub color: String,
    /// Unit price.
    pub price: Price,
    #[serde(default)]
    pub description: String,
    /// Image URL or path.
    #[serde(default)]
    pub image_src: String,
    /// Alternative text for the image.
    #[serde(default)]
    pub image_alt: String,
    /// Category path from the root, outermost first.
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
}
