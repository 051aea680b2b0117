use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockroom_core::interactions::rank_history;
use stockroom_core::{CatalogItem, Error, InteractionSource, NewProduct, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::lmdb_storage::LmdbStorage;

/// Manages the persisted product catalog
pub struct StorageManager {
    lmdb: Arc<LmdbStorage>,
    data_dir: PathBuf,
}

impl StorageManager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let lmdb_path = data_dir.join("lmdb");
        let lmdb = Arc::new(LmdbStorage::new(&lmdb_path)
            .map_err(|e| Error::Storage(e.to_string()))?);

        let manager = Self { lmdb, data_dir };
        let products = manager.count()?;
        info!(products, "Catalog storage opened at {:?}", manager.data_dir);
        Ok(manager)
    }

    /// Validate and persist a new product under a fresh UUID
    pub fn create_product(&self, product: NewProduct) -> Result<CatalogItem> {
        product.validate()?;
        let item = CatalogItem::from_new(Uuid::new_v4().to_string(), product, Utc::now());
        self.put(&item)?;
        debug!(product_id = %item.id, "Product created");
        Ok(item)
    }

    pub fn get_product(&self, id: &str) -> Result<Option<CatalogItem>> {
        self.lmdb
            .get_product(id)
            .map_err(|e| Error::Storage(e.to_string()))?
            .map(|data| decode(&data))
            .transpose()
    }

    /// Like [`get_product`](Self::get_product) but absence is an error
    pub fn require_product(&self, id: &str) -> Result<CatalogItem> {
        self.get_product(id)?
            .ok_or_else(|| Error::ProductNotFound(id.to_string()))
    }

    pub fn delete_product(&self, id: &str) -> Result<bool> {
        let existed = self.lmdb
            .delete_product(id)
            .map_err(|e| Error::Storage(e.to_string()))?;
        if existed {
            debug!(product_id = id, "Product deleted");
        }
        Ok(existed)
    }

    /// Full catalog ordered by creation time, then id
    pub fn list_products(&self) -> Result<Vec<CatalogItem>> {
        let mut items = self.lmdb
            .list_products()
            .map_err(|e| Error::Storage(e.to_string()))?
            .iter()
            .map(|data| decode(data))
            .collect::<Result<Vec<_>>>()?;
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    pub fn count(&self) -> Result<usize> {
        self.lmdb
            .count()
            .map(|n| n as usize)
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Seed the catalog from a JSON array of products.
    ///
    /// Entries that fail validation are skipped. Returns how many were stored.
    pub fn import_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let products: Vec<NewProduct> = serde_json::from_str(&raw)?;

        let mut imported = 0;
        for (position, product) in products.into_iter().enumerate() {
            match self.create_product(product) {
                Ok(_) => imported += 1,
                Err(Error::InvalidProduct(reason)) => {
                    warn!(position, %reason, "Skipping invalid seed product");
                }
                Err(e) => return Err(e),
            }
        }
        info!(imported, "Seed catalog imported from {:?}", path.as_ref());
        Ok(imported)
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn put(&self, item: &CatalogItem) -> Result<()> {
        let data = bincode::serialize(item)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        self.lmdb
            .save_product(&item.id, &data)
            .map_err(|e| Error::Storage(e.to_string()))
    }
}

impl InteractionSource for StorageManager {
    fn recent_interactions(&self, user_id: &str, limit: usize) -> Result<Vec<CatalogItem>> {
        let items = self.list_products()?;
        let owned = items
            .iter()
            .filter(|item| item.user_id.as_deref() == Some(user_id))
            .collect();
        Ok(rank_history(owned, limit))
    }
}

fn decode(data: &[u8]) -> Result<CatalogItem> {
    bincode::deserialize(data).map_err(|e| Error::Serialization(e.to_string()))
}
