use ahash::AHashMap;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::features::FeatureRecord;
use crate::item::{CatalogItem, InteractionType};
use crate::tfidf::TfidfVectorizer;
use crate::vector::SparseVector;

/// A similar product returned by a recommendation query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub similarity_score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<InteractionType>,
}

impl Recommendation {
    pub fn from_item(item: &CatalogItem, similarity_score: f32) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: item.price,
            stock: item.stock,
            similarity_score,
            interaction_weight: item.interaction_weight,
            interaction_type: item.interaction_type,
        }
    }
}

/// Fitted, immutable similarity state for one catalog snapshot.
///
/// Row/column `i` of the matrix belongs to `items[i]`. The matrix is dense,
/// symmetric, with values in [0, 1].
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    items: Vec<CatalogItem>,
    positions: AHashMap<String, usize>,
    // row-major n x n
    matrix: Vec<f32>,
    vectorizer: Option<TfidfVectorizer>,
}

impl SimilarityIndex {
    /// An index over zero items; every query against it is empty
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fit the vectorizer on `features` and compute the full pairwise matrix.
    ///
    /// `features[i]` must describe `items[i]`.
    pub fn build(items: Vec<CatalogItem>, features: &[FeatureRecord], max_features: usize) -> Self {
        debug_assert_eq!(items.len(), features.len());
        if items.is_empty() {
            return Self::empty();
        }

        let mut vectorizer = TfidfVectorizer::new(max_features);
        let texts: Vec<&str> = features.iter().map(|f| f.text.as_str()).collect();
        let vectors = vectorizer.fit_transform(&texts);
        let matrix = Self::pairwise_cosine(&vectors);

        let positions = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.clone(), i))
            .collect();

        Self {
            items,
            positions,
            matrix,
            vectorizer: Some(vectorizer),
        }
    }

    /// Row-parallel cosine matrix; only the upper triangle is computed and mirrored
    fn pairwise_cosine(vectors: &[SparseVector]) -> Vec<f32> {
        let n = vectors.len();
        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                (i..n)
                    .map(|j| {
                        if i == j {
                            if vectors[i].is_empty() { 0.0 } else { 1.0 }
                        } else {
                            vectors[i].cosine_similarity(&vectors[j])
                        }
                    })
                    .collect()
            })
            .collect();

        let mut matrix = vec![0.0f32; n * n];
        for (i, row) in upper.iter().enumerate() {
            for (offset, &score) in row.iter().enumerate() {
                let j = i + offset;
                matrix[i * n + j] = score;
                matrix[j * n + i] = score;
            }
        }
        matrix
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers in row order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    #[inline]
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[inline]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.position(id).map(|i| &self.items[i])
    }

    /// Similarity row for item `i`
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let n = self.len();
        &self.matrix[i * n..(i + 1) * n]
    }

    #[inline]
    pub fn similarity(&self, i: usize, j: usize) -> f32 {
        self.matrix[i * self.len() + j]
    }

    /// Fitted vectorizer, absent for the empty index
    #[inline]
    pub fn vectorizer(&self) -> Option<&TfidfVectorizer> {
        self.vectorizer.as_ref()
    }

    /// Up to `top_n` other items ordered by descending similarity.
    ///
    /// Ties keep catalog order. Unknown ids and the empty index yield an empty list.
    pub fn recommend(&self, id: &str, top_n: usize) -> Vec<Recommendation> {
        let Some(pos) = self.position(id) else {
            return Vec::new();
        };
        let row = self.row(pos);

        let mut candidates: Vec<usize> = (0..self.len()).filter(|&j| j != pos).collect();
        // stable: equal scores stay in ascending catalog order
        candidates.sort_by_key(|&j| Reverse(OrderedFloat(row[j])));
        candidates.truncate(top_n);

        candidates
            .into_iter()
            .map(|j| Recommendation::from_item(&self.items[j], row[j]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureBuilder;

    fn build(items: Vec<CatalogItem>) -> SimilarityIndex {
        let features = FeatureBuilder::build(&items);
        SimilarityIndex::build(items, &features, 5000)
    }

    fn sample() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("a", "Portland bag", "cement", 10.0),
            CatalogItem::new("b", "Quickset bag", "cement", 12.0),
            CatalogItem::new("c", "Pine stud", "lumber", 100.0),
            CatalogItem::new("d", "Copper pipe", "plumbing", 40.0),
        ]
    }

    #[test]
    fn test_empty_index() {
        let index = build(Vec::new());
        assert!(index.is_empty());
        assert!(index.vectorizer().is_none());
        assert!(index.recommend("a", 5).is_empty());
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let index = build(sample());
        let n = index.len();
        assert_eq!(index.row(0).len(), n);
        for i in 0..n {
            assert_eq!(index.similarity(i, i), 1.0);
            for j in 0..n {
                let s = index.similarity(i, j);
                assert_eq!(s, index.similarity(j, i));
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }

    #[test]
    fn test_recommend_excludes_self_and_orders() {
        let index = build(sample());
        let recs = index.recommend("a", 3);
        assert_eq!(recs.len(), 3);
        assert!(recs.iter().all(|r| r.id != "a"));
        assert_eq!(recs[0].id, "b");
        for pair in recs.windows(2) {
            assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
    }

    #[test]
    fn test_recommend_caps_at_available() {
        let index = build(sample());
        assert_eq!(index.recommend("a", 0).len(), 0);
        assert_eq!(index.recommend("a", 2).len(), 2);
        assert_eq!(index.recommend("a", 10).len(), 3);
        assert!(index.recommend("missing", 3).is_empty());
    }

    #[test]
    fn test_degenerate_vocabulary_keeps_catalog_order() {
        let items = vec![
            CatalogItem::new("x", "a", "of", 1.0),
            CatalogItem::new("y", "a", "of", 1.0),
            CatalogItem::new("z", "a", "of", 1.0),
        ];
        let features: Vec<FeatureRecord> = items
            .iter()
            .map(|item| FeatureRecord {
                id: item.id.clone(),
                text: "the a of".to_string(),
                price_tier: crate::features::PriceTier::Budget,
            })
            .collect();
        let index = SimilarityIndex::build(items, &features, 5000);
        assert_eq!(index.vectorizer().map(|v| v.vocabulary_size()), Some(0));

        let recs = index.recommend("z", 5);
        let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert!(recs.iter().all(|r| r.similarity_score == 0.0));
    }

    #[test]
    fn test_duplicates_score_one() {
        let items = vec![
            CatalogItem::new("a", "Steel beam", "steel", 90.0),
            CatalogItem::new("b", "Steel beam", "steel", 90.0),
            CatalogItem::new("c", "Hammer", "tools", 15.0),
        ];
        let index = build(items);
        assert_eq!(index.similarity(0, 1), 1.0);
        let recs = index.recommend("a", 1);
        assert_eq!(recs[0].id, "b");
        assert_eq!(recs[0].similarity_score, 1.0);
    }
}
