//! User interaction history.
//!
//! Personalized recommendations start from the items a user interacted with
//! most strongly. [`InteractionSource`] is the seam the storage layer plugs into;
//! a plain slice of items works too, which is what the tests use.

use std::cmp::Ordering;

use crate::{CatalogItem, Result};

/// Weight assumed for a user-owned item that carries no explicit weight
pub const DEFAULT_INTERACTION_WEIGHT: f64 = 1.0;

/// Supplies a user's strongest recent interactions
pub trait InteractionSource {
    /// Items owned by `user_id`, strongest weight first, newest first on ties,
    /// at most `limit` of them.
    fn recent_interactions(&self, user_id: &str, limit: usize) -> Result<Vec<CatalogItem>>;
}

impl InteractionSource for [CatalogItem] {
    fn recent_interactions(&self, user_id: &str, limit: usize) -> Result<Vec<CatalogItem>> {
        let owned: Vec<&CatalogItem> = self
            .iter()
            .filter(|item| item.user_id.as_deref() == Some(user_id))
            .collect();
        Ok(rank_history(owned, limit))
    }
}

impl InteractionSource for Vec<CatalogItem> {
    fn recent_interactions(&self, user_id: &str, limit: usize) -> Result<Vec<CatalogItem>> {
        self.as_slice().recent_interactions(user_id, limit)
    }
}

/// Effective weight of a user's interaction with `item`
#[inline]
pub fn effective_weight(item: &CatalogItem) -> f64 {
    item.interaction_weight.unwrap_or(DEFAULT_INTERACTION_WEIGHT)
}

/// Order a user's items by weight desc, then `created_at` desc, and cap them
pub fn rank_history(mut items: Vec<&CatalogItem>, limit: usize) -> Vec<CatalogItem> {
    items.sort_by(|a, b| {
        effective_weight(b)
            .partial_cmp(&effective_weight(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    items.into_iter().take(limit).cloned().collect()
}

/// Catalog-wide popularity order used when a user has no history.
///
/// Weighted items come first by weight desc; ties and unweighted items fall
/// back to `created_at` desc. With no weighted items this is plain recency.
pub fn rank_popular(items: &[CatalogItem], limit: usize) -> Vec<&CatalogItem> {
    let mut ranked: Vec<&CatalogItem> = items.iter().collect();
    ranked.sort_by(|a, b| {
        let wa = a.interaction_weight.unwrap_or(f64::NEG_INFINITY);
        let wb = b.interaction_weight.unwrap_or(f64::NEG_INFINITY);
        wb.partial_cmp(&wa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    ranked.truncate(limit);
    ranked
}
