//! Feature Builder
//!
//! Turns catalog items into the text documents the TF-IDF vectorizer is fitted on.
//! Each document is the lowercased `name description category` text followed by
//! derived tokens: matched domain categories, materials, measurement spans and
//! finally the item's price tier label.
//!
//! All derivation rules live in the lookup tables below so new keywords or
//! patterns never touch the index code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::CatalogItem;

/// Domain category -> keywords that imply it (substring match)
pub static DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    ("cement", &["cement", "concrete", "mortar", "grout", "masonry"]),
    ("steel", &["steel", "rebar", "iron", "girder", "beam"]),
    ("lumber", &["lumber", "wood", "timber", "plywood", "plank", "board"]),
    ("electrical", &["electrical", "wire", "cable", "switch", "outlet", "breaker", "conduit"]),
    ("plumbing", &["plumbing", "pipe", "faucet", "valve", "drain", "fitting"]),
    ("roofing", &["roofing", "roof", "shingle", "gutter", "flashing"]),
    ("flooring", &["flooring", "floor", "tile", "laminate", "vinyl", "carpet"]),
    ("tools", &["tool", "drill", "saw", "hammer", "wrench", "screwdriver"]),
    ("safety", &["safety", "helmet", "glove", "goggle", "vest", "harness"]),
];

/// Materials appended verbatim when found anywhere in the text
pub static MATERIALS: &[&str] = &[
    "concrete", "steel", "wood", "plastic", "metal", "ceramic", "glass", "rubber",
];

/// Measurement patterns; every match is appended as-is
static MEASUREMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // 12 inch, 2.5 ft, 600mm
        Regex::new(r"\b\d+(?:\.\d+)?\s*(?:inches|inch|feet|foot|ft|mm|cm|meters|meter)\b").ok(),
        // 4x8, 2 x 4
        Regex::new(r"\b\d+(?:\.\d+)?\s*x\s*\d+(?:\.\d+)?\b").ok(),
        // 50 lb, 25kg
        Regex::new(r"\b\d+(?:\.\d+)?\s*(?:lbs|lb|kg)\b").ok(),
    ]
    .into_iter()
    .flatten()
    .collect()
});

/// Price bucket over the catalog's normalized price range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget = 0,
    Economy = 1,
    Mid = 2,
    Premium = 3,
    Luxury = 4,
}

impl PriceTier {
    pub const COUNT: usize = 5;

    const ALL: [PriceTier; 5] = [
        PriceTier::Budget,
        PriceTier::Economy,
        PriceTier::Mid,
        PriceTier::Premium,
        PriceTier::Luxury,
    ];

    /// Bucket a price normalized to [0, 1] into equal-width tiers.
    ///
    /// A value on a bin boundary lands in the cheaper tier; 1.0 is always `Luxury`.
    #[must_use]
    pub fn from_normalized(normalized: f64) -> Self {
        if normalized >= 1.0 {
            return PriceTier::Luxury;
        }
        let scaled = (normalized.max(0.0) * Self::COUNT as f64).ceil() as usize;
        Self::ALL[scaled.saturating_sub(1).min(Self::COUNT - 1)]
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PriceTier::Budget => "budget",
            PriceTier::Economy => "economy",
            PriceTier::Mid => "mid",
            PriceTier::Premium => "premium",
            PriceTier::Luxury => "luxury",
        }
    }
}

/// Derived per-item features, discarded once the index consumes them
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub id: String,
    pub text: String,
    pub price_tier: PriceTier,
}

/// Stateless builder for [`FeatureRecord`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// One record per item, in catalog order
    pub fn build(items: &[CatalogItem]) -> Vec<FeatureRecord> {
        let (min, max) = items.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), item| {
            (lo.min(item.price), hi.max(item.price))
        });
        let range = if max > min { max - min } else { 1.0 };

        items
            .iter()
            .map(|item| {
                let tier = PriceTier::from_normalized((item.price - min) / range);
                FeatureRecord {
                    id: item.id.clone(),
                    text: Self::feature_text(item, tier),
                    price_tier: tier,
                }
            })
            .collect()
    }

    /// Composite text plus derived tokens for a single item
    pub fn feature_text(item: &CatalogItem, tier: PriceTier) -> String {
        let base = format!(
            "{} {} {}",
            item.name,
            item.description_or_empty(),
            item.category
        )
        .to_lowercase();

        let mut text = base.clone();
        for token in Self::derived_tokens(&base) {
            text.push(' ');
            text.push_str(&token);
        }
        text.push(' ');
        text.push_str(tier.label());
        text
    }

    /// Domain categories, materials and measurement spans found in `text`
    pub fn derived_tokens(text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for (category, keywords) in DOMAIN_KEYWORDS {
            if keywords.iter().any(|kw| text.contains(kw)) {
                tokens.push((*category).to_string());
            }
        }

        tokens.extend(
            MATERIALS
                .iter()
                .filter(|material| text.contains(*material))
                .map(|material| (*material).to_string()),
        );

        for pattern in MEASUREMENT_PATTERNS.iter() {
            tokens.extend(pattern.find_iter(text).map(|m| m.as_str().to_string()));
        }

        tokens
    }
}
