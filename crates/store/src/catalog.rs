//! Read-only product catalog.
//!
//! The cart never mutates the catalog; it only looks products up by id. A
//! catalog reports a `revision` that changes whenever its contents change,
//! which is what the store keys its derived-view cache on.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use cart_core::{CurrencyCode, Product, ProductId};

/// Errors that can occur when building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {id} appears more than once in the catalog")]
    DuplicateProduct { id: ProductId },

    #[error("product {id} is priced in {found}, catalog currency is {expected}")]
    MixedCurrency {
        id: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("unsupported catalog format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(String),
}

/// Product lookup used by the cart store.
pub trait Catalog {
    /// Look a product up by id.
    fn product(&self, id: ProductId) -> Option<&Product>;

    /// All products, in catalog order.
    fn products(&self) -> &[Product];

    /// Changes whenever the catalog's contents change.
    fn revision(&self) -> u64;

    /// Currency every price in the catalog is expressed in.
    fn currency(&self) -> CurrencyCode;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn product(&self, id: ProductId) -> Option<&Product> {
        (**self).product(id)
    }

    fn products(&self) -> &[Product] {
        (**self).products()
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }

    fn currency(&self) -> CurrencyCode {
        (**self).currency()
    }
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn product(&self, id: ProductId) -> Option<&Product> {
        (**self).product(id)
    }

    fn products(&self) -> &[Product] {
        (**self).products()
    }

    fn revision(&self) -> u64 {
        (**self).revision()
    }

    fn currency(&self) -> CurrencyCode {
        (**self).currency()
    }
}

/// An in-memory catalog indexed by product id.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
    currency: CurrencyCode,
    revision: u64,
}

impl StaticCatalog {
    /// Build a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or if prices use more
    /// than one currency.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let (index, currency) = build_index(&products)?;
        Ok(Self {
            products,
            index,
            currency,
            revision: 0,
        })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the products are invalid.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(products)
    }

    /// Parse a YAML sequence of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the products are invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(products)
    }

    /// Load a catalog file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has an unknown
    /// extension, or does not contain a valid catalog.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let content = std::fs::read_to_string(path)?;
        let catalog = match extension.as_str() {
            "json" => Self::from_json_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            _ => return Err(CatalogError::UnsupportedFormat(path.display().to_string())),
        };

        info!(
            path = %path.display(),
            products = catalog.len(),
            currency = %catalog.currency,
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Swap the catalog contents and bump the revision.
    ///
    /// On error the catalog is left unchanged.
    ///
    /// # Errors
    ///
    /// Same validation as [`StaticCatalog::new`].
    pub fn replace_products(&mut self, products: Vec<Product>) -> Result<(), CatalogError> {
        let (index, currency) = build_index(&products)?;
        self.products = products;
        self.index = index;
        if !self.products.is_empty() {
            self.currency = currency;
        }
        self.revision += 1;
        Ok(())
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).and_then(|&i| self.products.get(i))
    }

    fn products(&self) -> &[Product] {
        &self.products
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn currency(&self) -> CurrencyCode {
        self.currency
    }
}

/// Index products by id and check they share one currency.
fn build_index(
    products: &[Product],
) -> Result<(HashMap<ProductId, usize>, CurrencyCode), CatalogError> {
    let currency = products
        .first()
        .map(|p| p.price.currency_code)
        .unwrap_or_default();

    let mut index = HashMap::with_capacity(products.len());
    for (i, product) in products.iter().enumerate() {
        if product.price.currency_code != currency {
            return Err(CatalogError::MixedCurrency {
                id: product.id,
                expected: currency,
                found: product.price.currency_code,
            });
        }
        if index.insert(product.id, i).is_some() {
            return Err(CatalogError::DuplicateProduct { id: product.id });
        }
    }

    Ok((index, currency))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::io::Write;

    use cart_core::Price;

    use super::*;

    pub(crate) fn product(id: u32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            color: "Black".to_string(),
            price: Price::parse(price).unwrap(),
            description: String::new(),
            image_src: format!("/images/{id}.jpg"),
            image_alt: String::new(),
            breadcrumbs: Vec::new(),
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = StaticCatalog::new(vec![product(1, "$10.00"), product(2, "$5.50")]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.product(ProductId::new(2)).unwrap().name, "Product 2");
        assert!(catalog.product(ProductId::new(3)).is_none());
        assert_eq!(catalog.currency(), CurrencyCode::USD);
    }

    #[test]
    fn test_products_keep_input_order() {
        let catalog = StaticCatalog::new(vec![product(5, "$1"), product(1, "$2")]).unwrap();
        let ids: Vec<u32> = catalog.products().iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![5, 1]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = StaticCatalog::new(vec![product(1, "$1"), product(1, "$2")]);
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateProduct { id }) if id == ProductId::new(1)
        ));
    }

    #[test]
    fn test_rejects_mixed_currency() {
        let result = StaticCatalog::new(vec![product(1, "$1"), product(2, "€2")]);
        assert!(matches!(result, Err(CatalogError::MixedCurrency { .. })));
    }

    #[test]
    fn test_replace_products_bumps_revision() {
        let mut catalog = StaticCatalog::new(vec![product(1, "$1")]).unwrap();
        assert_eq!(catalog.revision(), 0);

        catalog.replace_products(vec![product(2, "$2")]).unwrap();
        assert_eq!(catalog.revision(), 1);
        assert!(catalog.product(ProductId::new(1)).is_none());
        assert!(catalog.product(ProductId::new(2)).is_some());

        assert!(catalog
            .replace_products(vec![product(3, "$1"), product(3, "$1")])
            .is_err());
        assert_eq!(catalog.revision(), 1);
        assert!(catalog.product(ProductId::new(2)).is_some());
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
- id: 1
  name: Basic Tee
  price: "$35.00"
  breadcrumbs:
    - id: 1
      name: Men
- id: 2
  name: Zip Tote
  price: "$140.00"
"#;
        let catalog = StaticCatalog::from_yaml_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.product(ProductId::new(2)).unwrap().price.to_string(),
            "$140.00"
        );
    }

    #[test]
    fn test_from_json_str_parse_error() {
        assert!(matches!(
            StaticCatalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"id": 4, "name": "Mug", "price": "£8.00"}}]"#).unwrap();

        let catalog = StaticCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.currency(), CurrencyCode::GBP);

        let other = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        assert!(matches!(
            StaticCatalog::from_path(other.path()),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }
}
