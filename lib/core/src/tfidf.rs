// TF-IDF vectorizer over feature strings
use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::vector::SparseVector;

/// Default cap on vocabulary size
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// English stop words dropped during tokenization
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
        "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
        "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
        "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him",
        "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more",
        "most", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
        "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such",
        "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
        "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
        "you", "your", "yours",
    ]
    .into_iter()
    .collect()
});

/// Term-frequency / inverse-document-frequency vectorizer.
///
/// Fitting assigns every surviving term a column (alphabetical order) and a
/// smoothed idf weight `ln((1 + n) / (1 + df)) + 1`. Document vectors are raw
/// term counts scaled by idf and L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    // term -> column
    vocabulary: AHashMap<String, u32>,
    // column -> idf weight
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    #[inline]
    #[must_use]
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Lowercase, split on whitespace and punctuation, drop single characters and stop words
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|s| s.chars().count() > 1 && !STOP_WORDS.contains(*s))
            .map(str::to_string)
            .collect()
    }

    /// Fit the vocabulary and idf weights on `documents` and vectorize them
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| Self::tokenize(doc.as_ref()))
            .collect();

        // term -> (corpus frequency, document frequency)
        let mut stats: AHashMap<&str, (u64, u64)> = AHashMap::new();
        for tokens in &tokenized {
            let mut seen: HashSet<&str> = HashSet::new();
            for token in tokens {
                let entry = stats.entry(token.as_str()).or_insert((0, 0));
                entry.0 += 1;
                if seen.insert(token.as_str()) {
                    entry.1 += 1;
                }
            }
        }

        let mut terms: Vec<(&str, u64, u64)> =
            stats.into_iter().map(|(t, (cf, df))| (t, cf, df)).collect();
        if terms.len() > self.max_features {
            terms.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            terms.truncate(self.max_features);
        }
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let n_docs = documents.len() as f64;
        self.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(col, (term, _, _))| ((*term).to_string(), col as u32))
            .collect();
        self.idf = terms
            .iter()
            .map(|(_, _, df)| (((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0) as f32)
            .collect();

        tokenized.iter().map(|tokens| self.vectorize(tokens)).collect()
    }

    /// Vectorize unseen text against the fitted vocabulary
    pub fn transform(&self, document: &str) -> SparseVector {
        self.vectorize(&Self::tokenize(document))
    }

    fn vectorize(&self, tokens: &[String]) -> SparseVector {
        let mut counts: AHashMap<u32, u32> = AHashMap::new();
        for token in tokens {
            if let Some(&col) = self.vocabulary.get(token) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }

        let mut vector = SparseVector::new(
            counts
                .into_iter()
                .map(|(col, tf)| (col, tf as f32 * self.idf[col as usize]))
                .collect(),
        );
        vector.normalize();
        vector
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    #[must_use]
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Column assigned to `term`, if it survived fitting
    #[inline]
    pub fn column(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    #[inline]
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.column(term).map(|col| self.idf[col as usize])
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}
