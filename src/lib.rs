//! # Stockroom
//!
//! A product catalog service with content-based "similar products" recommendations.
//!
//! Every catalog mutation triggers a full rebuild of a TF-IDF similarity index
//! over product features (name, description, category, derived domain keywords
//! and a price tier). Queries read an immutable snapshot of that index, so they
//! never block on, or observe, a rebuild in progress.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install stockroom
//! stockroom --http-port 8000 --data-dir ./data --seed catalog.json
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use stockroom::prelude::*;
//!
//! let recommender = Recommender::new(RecommenderConfig::default());
//! recommender.rebuild(vec![
//!     CatalogItem::new("a", "Portland bag", "cement", 10.0),
//!     CatalogItem::new("b", "Quickset bag", "cement", 12.0),
//!     CatalogItem::new("c", "Pine stud", "lumber", 100.0),
//! ]);
//!
//! let similar = recommender.recommend("a", 2);
//! assert_eq!(similar[0].id, "b");
//! ```
//!
//! ## Crate Structure
//!
//! - `stockroom-core` - Feature building, TF-IDF, similarity index, recommender
//! - `stockroom-storage` - LMDB-backed catalog persistence
//! - `stockroom-api` - REST API

// Re-export core types
pub use stockroom_core::{
    CatalogItem, NewProduct, InteractionType, InteractionSource,
    FeatureBuilder, FeatureRecord, PriceTier,
    TfidfVectorizer, SparseVector,
    SimilarityIndex, Recommendation,
    Recommender, RecommenderConfig,
    Error, Result,
};

// Re-export storage
pub use stockroom_storage::StorageManager;

// Re-export API
pub use stockroom_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogItem, NewProduct, InteractionType, InteractionSource,
        SimilarityIndex, Recommendation,
        Recommender, RecommenderConfig,
        Error, Result,
        StorageManager,
        AppState, RestApi,
    };
}
