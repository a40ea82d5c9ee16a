//! Durable last-known-good catalog snapshot.
//!
//! One JSON file holding the serialized catalog and nothing else. No expiry,
//! no versioning: a hit is always considered usable regardless of age. The
//! synchronizer decides when a served snapshot should be flagged stale.

use std::path::PathBuf;

use tracing::debug;

use gearstock_core::Product;

use crate::config::ClientConfig;
use crate::storage;

/// File name of the catalog snapshot inside the data directory.
const SNAPSHOT_FILE: &str = "catalog.json";

/// Key-value durable store for the catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    /// Create a cache rooted in the configured data directory.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            path: config.data_dir.join(SNAPSHOT_FILE),
        }
    }

    /// Overwrite the snapshot with the given catalog. Never partial: the
    /// write goes to a temp file first and is renamed into place.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the snapshot cannot be written.
    pub async fn save(&self, catalog: &[Product]) -> std::io::Result<()> {
        storage::write_json_atomic(&self.path, &catalog).await?;
        debug!(len = catalog.len(), "catalog snapshot written");
        Ok(())
    }

    /// Load the snapshot. A missing or malformed file is `None`, never a
    /// fatal error.
    pub async fn load(&self) -> Option<Vec<Product>> {
        storage::read_json_lenient(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearstock_core::ProductId;
    use rust_decimal::dec;
    use std::time::Duration;
    use url::Url;

    fn cache(dir: &std::path::Path) -> CatalogCache {
        CatalogCache::new(&ClientConfig {
            api_base_url: Url::parse("https://parts.example.com").expect("url"),
            data_dir: dir.to_path_buf(),
            request_timeout: Duration::from_secs(5),
        })
    }

    fn product(id: &str, quantity: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("part-{id}"),
            category: "Brakes".to_string(),
            price: dec!(2200),
            quantity,
            threshold: 5,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache(dir.path());

        let catalog = vec![product("a", 2), product("b", 10)];
        cache.save(&catalog).await.expect("save");
        assert_eq!(cache.load().await, Some(catalog));
    }

    #[tokio::test]
    async fn test_save_overwrites_prior_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache(dir.path());

        cache.save(&[product("a", 2)]).await.expect("save");
        let replacement = vec![product("b", 1)];
        cache.save(&replacement).await.expect("save again");
        assert_eq!(cache.load().await, Some(replacement));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(cache(dir.path()).load().await, None);
    }

    #[tokio::test]
    async fn test_load_malformed_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(dir.path().join(SNAPSHOT_FILE), b"[{oops")
            .await
            .expect("write");
        assert_eq!(cache(dir.path()).load().await, None);
    }

    #[tokio::test]
    async fn test_empty_catalog_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = cache(dir.path());
        cache.save(&[]).await.expect("save");
        assert_eq!(cache.load().await, Some(vec![]));
    }
}
