//! # Stockroom Core
//!
//! Core library for the Stockroom catalog service.
//!
//! This crate provides the recommendation engine:
//!
//! - [`CatalogItem`] - A product snapshot as read from the catalog
//! - [`FeatureBuilder`] - Derives the text document each item is vectorized from
//! - [`TfidfVectorizer`] - Term weighting over feature documents
//! - [`SimilarityIndex`] - Dense pairwise cosine matrix with top-k queries
//! - [`Recommender`] - Owns the current index snapshot and answers queries
//!
//! ## Example
//!
//! ```rust
//! use stockroom_core::{CatalogItem, Recommender, RecommenderConfig};
//!
//! let recommender = Recommender::new(RecommenderConfig::default());
//!
//! recommender.rebuild(vec![
//!     CatalogItem::new("a", "Portland bag", "cement", 10.0),
//!     CatalogItem::new("b", "Quickset bag", "cement", 12.0),
//!     CatalogItem::new("c", "Pine stud", "lumber", 100.0),
//! ]);
//!
//! let similar = recommender.recommend("a", 2);
//! assert_eq!(similar[0].id, "b");
//! ```

pub mod error;
pub mod item;
pub mod features;
pub mod vector;
pub mod tfidf;
pub mod index;
pub mod interactions;
pub mod recommender;

pub use error::{Error, Result};
pub use item::{CatalogItem, InteractionType, NewProduct};
pub use features::{FeatureBuilder, FeatureRecord, PriceTier};
pub use vector::SparseVector;
pub use tfidf::TfidfVectorizer;
pub use index::{Recommendation, SimilarityIndex};
pub use interactions::InteractionSource;
pub use recommender::{Recommender, RecommenderConfig};
