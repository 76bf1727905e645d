//! Cheaper look-alike ("dupe") search over mechanism vectors.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::product::{Category, SkuVector, Texture};
use crate::domain::recommendation::DupeMatch;
use crate::numeric::{clamp01, cosine_similarity};

pub const DEFAULT_DUPE_LIMIT: usize = 3;
pub const STICKINESS_NOTE_THRESHOLD: f64 = 0.6;
pub const PILLING_NOTE_THRESHOLD: f64 = 0.6;

/// Broad product class used to keep dupes comparable: actives are only
/// matched against actives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DupeClass {
    ActiveTreatment,
    Basics,
}

impl DupeClass {
    pub fn of(category: Category) -> Self {
        match category {
            Category::Serum | Category::Treatment => Self::ActiveTreatment,
            Category::Cleanser | Category::Toner | Category::Moisturizer | Category::Sunscreen => {
                Self::Basics
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct DupeMatcher {
    default_limit: usize,
}

impl DupeMatcher {
    pub fn new() -> Self {
        Self { default_limit: DEFAULT_DUPE_LIMIT }
    }

    pub fn with_default_limit(default_limit: usize) -> Self {
        Self { default_limit: default_limit.max(1) }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn find(
        &self,
        anchor: &SkuVector,
        catalog: &[SkuVector],
        limit: Option<usize>,
    ) -> Vec<DupeMatch> {
        find_dupes(anchor, catalog, self.resolve_limit(limit))
    }

    pub fn find_in_class(
        &self,
        anchor: &SkuVector,
        catalog: &[SkuVector],
        limit: Option<usize>,
    ) -> Vec<DupeMatch> {
        find_dupes_in_class(anchor, catalog, self.resolve_limit(limit))
    }

    fn resolve_limit(&self, limit: Option<usize>) -> usize {
        match limit {
            Some(limit) if limit > 0 => limit,
            _ => self.default_limit,
        }
    }
}

impl Default for DupeMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Strictly cheaper candidates ranked by mechanism cosine similarity.
/// Ties keep catalog order. A zero `limit` means the default of 3.
pub fn find_dupes(anchor: &SkuVector, catalog: &[SkuVector], limit: usize) -> Vec<DupeMatch> {
    let limit = if limit == 0 { DEFAULT_DUPE_LIMIT } else { limit };
    let anchor_vector = anchor.mechanism.to_dense();

    let mut matches: Vec<DupeMatch> = catalog
        .iter()
        .filter(|candidate| candidate.id != anchor.id && candidate.price < anchor.price)
        .map(|candidate| DupeMatch {
            sku: candidate.clone(),
            similarity: clamp01(cosine_similarity(&anchor_vector, &candidate.mechanism.to_dense())),
            tradeoff_note: tradeoff_note(anchor, candidate),
        })
        .collect();

    matches.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
    matches.truncate(limit);

    debug!(
        event_name = "engine.dupes.ranked",
        anchor_id = %anchor.id,
        catalog_size = catalog.len(),
        returned = matches.len(),
        "dupe candidates ranked"
    );

    matches
}

/// Same as [`find_dupes`] after restricting the pool to the anchor's class.
pub fn find_dupes_in_class(
    anchor: &SkuVector,
    catalog: &[SkuVector],
    limit: usize,
) -> Vec<DupeMatch> {
    let class = DupeClass::of(anchor.category);
    let pool: Vec<SkuVector> =
        catalog.iter().filter(|sku| DupeClass::of(sku.category) == class).cloned().collect();
    find_dupes(anchor, &pool, limit)
}

/// First applicable trade-off, in priority order. Exactly one note.
pub fn tradeoff_note(anchor: &SkuVector, candidate: &SkuVector) -> String {
    let experience = &candidate.experience;

    if experience.texture == Texture::Sticky
        || clamp01(experience.stickiness) >= STICKINESS_NOTE_THRESHOLD
    {
        return "Texture may feel sticky compared to the original".to_string();
    }

    if clamp01(experience.pilling_risk) >= PILLING_NOTE_THRESHOLD {
        return "Higher pilling risk under makeup or sunscreen".to_string();
    }

    if candidate.price < anchor.price {
        let saving = (anchor.price - candidate.price).round_dp(2);
        return format!("Saves {} {} versus {}", candidate.currency, saving, anchor.name);
    }

    "Lower-cost alternative with a similar mechanism profile".to_string()
}
