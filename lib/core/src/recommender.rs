use ahash::AHashSet;
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::features::FeatureBuilder;
use crate::index::{Recommendation, SimilarityIndex};
use crate::interactions::{effective_weight, rank_popular, InteractionSource};
use crate::tfidf::DEFAULT_MAX_FEATURES;
use crate::{CatalogItem, Error, Result};

/// Configuration for a [`Recommender`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Vocabulary cap for the TF-IDF vectorizer
    pub max_features: usize,
    /// How many of a user's strongest interactions are considered
    pub history_window: usize,
    /// How many of those are actually queried for neighbours
    pub history_sources: usize,
    /// Neighbours fetched per queried interaction
    pub per_source_top_n: usize,
    /// Score boost per unit of interaction weight
    pub boost_factor: f32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            history_window: 20,
            history_sources: 5,
            per_source_top_n: 3,
            boost_factor: 0.1,
        }
    }
}

impl RecommenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(Error::InvalidConfig("max_features must be at least 1".to_string()));
        }
        if self.history_sources > self.history_window {
            return Err(Error::InvalidConfig(format!(
                "history_sources ({}) exceeds history_window ({})",
                self.history_sources, self.history_window
            )));
        }
        if !self.boost_factor.is_finite() || self.boost_factor < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "boost_factor must be a non-negative number, got {}",
                self.boost_factor
            )));
        }
        Ok(())
    }
}

/// Owns the current [`SimilarityIndex`] snapshot.
///
/// Rebuilds run entirely outside the lock; the write guard is only held to swap
/// the `Arc`. Queries clone the handle under a read guard and then work on that
/// snapshot alone, so they never observe a partially built index. Concurrent
/// rebuilds are last-publish-wins.
pub struct Recommender {
    config: RecommenderConfig,
    current: RwLock<Arc<SimilarityIndex>>,
    generation: AtomicU64,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(SimilarityIndex::empty())),
            generation: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Number of snapshots published so far
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Current snapshot handle
    #[inline]
    pub fn snapshot(&self) -> Arc<SimilarityIndex> {
        self.current.read().clone()
    }

    /// Rebuild from the full ordered catalog and publish the result
    pub fn rebuild(&self, catalog: Vec<CatalogItem>) -> Arc<SimilarityIndex> {
        let started = Instant::now();
        let features = FeatureBuilder::build(&catalog);
        let index = Arc::new(SimilarityIndex::build(catalog, &features, self.config.max_features));

        *self.current.write() = index.clone();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        info!(
            items = index.len(),
            vocabulary = index.vectorizer().map_or(0, |v| v.vocabulary_size()),
            generation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Similarity index rebuilt"
        );
        index
    }

    /// Up to `top_n` items most similar to `id`; empty when `id` is unknown
    pub fn recommend(&self, id: &str, top_n: usize) -> Vec<Recommendation> {
        self.snapshot().recommend(id, top_n)
    }

    /// Recommendations seeded by a user's strongest interactions.
    ///
    /// Each of the top `history_sources` interactions contributes its
    /// `per_source_top_n` neighbours with the score boosted by
    /// `boost_factor * weight` (capped at 1.0). The merged list keeps the first
    /// occurrence of every id and is re-sorted by boosted score. Users without
    /// history get the catalog's most interacted-with items instead.
    pub fn recommend_for_user<S>(
        &self,
        user_id: &str,
        top_n: usize,
        source: &S,
    ) -> Result<Vec<Recommendation>>
    where
        S: InteractionSource + ?Sized,
    {
        let snapshot = self.snapshot();
        let history = source.recent_interactions(user_id, self.config.history_window)?;

        if history.is_empty() {
            debug!(user_id, "No interaction history, using popular items");
            return Ok(rank_popular(snapshot.items(), top_n)
                .into_iter()
                .map(|item| Recommendation::from_item(item, 0.0))
                .collect());
        }

        let mut seen: AHashSet<String> = AHashSet::new();
        let mut merged: Vec<Recommendation> = Vec::new();

        for interaction in history.iter().take(self.config.history_sources) {
            if snapshot.position(&interaction.id).is_none() {
                warn!(
                    user_id,
                    product_id = %interaction.id,
                    "Interaction refers to a product missing from the index, skipping"
                );
                continue;
            }

            let boost = self.config.boost_factor * effective_weight(interaction) as f32;
            for mut rec in snapshot.recommend(&interaction.id, self.config.per_source_top_n) {
                if seen.insert(rec.id.clone()) {
                    rec.similarity_score = (rec.similarity_score + boost).min(1.0);
                    merged.push(rec);
                }
            }
        }

        merged.sort_by_key(|rec| Reverse(OrderedFloat(rec.similarity_score)));
        merged.truncate(top_n);
        Ok(merged)
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}
