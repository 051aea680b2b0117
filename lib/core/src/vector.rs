use serde::{Deserialize, Serialize};

/// A sparse vector of `(column, weight)` entries sorted by column
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f32)>,
}

impl SparseVector {
    /// Build from arbitrary entries; sorts by column and drops zero weights
    #[must_use]
    pub fn new(mut entries: Vec<(u32, f32)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_unstable_by_key(|(col, _)| *col);
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[(u32, f32)] {
        &self.entries
    }

    #[inline]
    pub fn get(&self, column: u32) -> f32 {
        self.entries
            .binary_search_by_key(&column, |(col, _)| *col)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    /// Cosine similarity clamped to [0, 1].
    ///
    /// Zero vectors score 0.0 and identical non-zero vectors score exactly 1.0.
    pub fn cosine_similarity(&self, other: &SparseVector) -> f32 {
        if self.is_empty() || other.is_empty() {
            return 0.0;
        }
        if self == other {
            return 1.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (self.dot(other) / (norm_a * norm_b)).clamp(0.0, 1.0)
    }

    /// Normalize the vector to unit length
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for (_, w) in &mut self.entries {
                *w *= inv_norm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_and_drops_zeros() {
        let v = SparseVector::new(vec![(5, 1.0), (1, 2.0), (3, 0.0)]);
        assert_eq!(v.entries(), &[(1, 2.0), (5, 1.0)]);
        assert_eq!(v.get(5), 1.0);
        assert_eq!(v.get(3), 0.0);
    }

    #[test]
    fn test_cosine_similarity() {
        let v1 = SparseVector::new(vec![(0, 1.0)]);
        let v2 = SparseVector::new(vec![(0, 3.0)]);
        assert!((v1.cosine_similarity(&v2) - 1.0).abs() < 1e-6);

        let v3 = SparseVector::new(vec![(0, 1.0)]);
        let v4 = SparseVector::new(vec![(1, 1.0)]);
        assert_eq!(v3.cosine_similarity(&v4), 0.0);

        let v5 = SparseVector::new(vec![(0, 1.0), (1, 1.0)]);
        assert!((v3.cosine_similarity(&v5) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_identical_and_zero_vectors() {
        let v = SparseVector::new(vec![(2, 0.3), (7, 0.4)]);
        assert_eq!(v.cosine_similarity(&v.clone()), 1.0);

        let zero = SparseVector::default();
        assert_eq!(zero.cosine_similarity(&v), 0.0);
        assert_eq!(zero.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = SparseVector::new(vec![(0, 3.0), (4, 4.0)]);
        v.normalize();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!((v.get(4) - 0.8).abs() < 1e-6);
    }
}
