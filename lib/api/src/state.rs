use std::sync::Arc;
use stockroom_core::{Recommender, Result, SimilarityIndex};
use stockroom_storage::StorageManager;

/// Shared handles every request works with
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageManager>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(storage: Arc<StorageManager>, recommender: Arc<Recommender>) -> Self {
        Self { storage, recommender }
    }

    /// Re-read the full catalog and publish a fresh index
    pub fn refresh(&self) -> Result<Arc<SimilarityIndex>> {
        let catalog = self.storage.list_products()?;
        Ok(self.recommender.rebuild(catalog))
    }
}
