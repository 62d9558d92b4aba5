//! CLI command implementations.

use std::path::PathBuf;

use tracing::debug;

use cart_store::{
    CartConfig, CartPersistence, CartStore, ConfigError, FileStorage, StaticCatalog,
    tracing_observer,
};
use cart_store::error::Result;

pub mod cart;
pub mod catalog;

/// The store every cart command operates on.
pub type FileCartStore = CartStore<StaticCatalog, FileStorage>;

/// Settings given on the command line; they win over the environment.
#[derive(Debug, Default)]
pub struct Overrides {
    pub catalog: Option<PathBuf>,
    pub storage: Option<PathBuf>,
    pub key: Option<String>,
}

/// Load configuration from the environment and apply command-line overrides.
///
/// # Errors
///
/// Returns an error if an environment variable or a command-line override
/// holds an invalid value.
pub fn resolve_config(overrides: Overrides) -> std::result::Result<CartConfig, ConfigError> {
    let mut config = CartConfig::from_env()?;
    apply_overrides(&mut config, overrides)?;
    Ok(config)
}

fn apply_overrides(
    config: &mut CartConfig,
    overrides: Overrides,
) -> std::result::Result<(), ConfigError> {
    if let Some(catalog) = overrides.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(storage) = overrides.storage {
        config.storage_path = storage;
    }
    if let Some(key) = overrides.key {
        config.storage_key = key;
    }
    config.validate()
}

/// Load the catalog and restore the cart from the session file.
///
/// # Errors
///
/// Returns an error if no catalog is configured or it cannot be loaded.
pub fn open_store(config: &CartConfig) -> Result<FileCartStore> {
    let catalog = StaticCatalog::from_path(config.require_catalog_path()?)?;
    let persistence = CartPersistence::with_key(
        FileStorage::new(&config.storage_path),
        config.storage_key.clone(),
    );

    debug!(
        storage = %persistence.storage().path().display(),
        key = %persistence.key(),
        "Opening cart"
    );

    let mut store = CartStore::with_persistence(catalog, persistence);
    store.subscribe(tracing_observer());
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::path::Path;

    use super::*;

    pub(crate) const CATALOG_YAML: &str = r#"
- id: 1
  name: Basic Tee
  color: Black
  price: "$10.00"
- id: 2
  name: Nomad Tumbler
  color: White
  price: "$5.50"
"#;

    pub(crate) fn config_in(dir: &Path) -> CartConfig {
        let catalog_path = dir.join("catalog.yaml");
        std::fs::write(&catalog_path, CATALOG_YAML).unwrap();
        CartConfig {
            catalog_path: Some(catalog_path),
            storage_path: dir.join("session.json"),
            ..CartConfig::default()
        }
    }

    #[test]
    fn test_overrides_win() {
        let mut config = CartConfig::default();
        apply_overrides(
            &mut config,
            Overrides {
                catalog: Some(PathBuf::from("c.json")),
                storage: None,
                key: Some("other".to_string()),
            },
        )
        .unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("c.json")));
        assert_eq!(config.storage_key, "other");
        assert_eq!(config.storage_path, CartConfig::default().storage_path);
    }

    #[test]
    fn test_blank_key_override_rejected() {
        let mut config = CartConfig::default();
        let err = apply_overrides(
            &mut config,
            Overrides {
                key: Some(String::new()),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting(ref name, _) if name == "storage key"));
    }

    #[test]
    fn test_open_store_requires_catalog() {
        let err = open_store(&CartConfig::default()).unwrap_err();
        assert!(err.to_string().contains("CART_CATALOG_PATH"));
    }

    #[test]
    fn test_open_store_restores_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let mut store = open_store(&config).unwrap();
        store.increment(cart_core::ProductId::new(2));
        drop(store);

        let store = open_store(&config).unwrap();
        assert_eq!(store.quantity_of(cart_core::ProductId::new(2)), 1);
    }
}
