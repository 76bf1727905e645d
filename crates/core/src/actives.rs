//! Active-ingredient token matching across English/INCI and Chinese names.
//!
//! Matching is plain substring search over NFKC-normalized, lower-cased
//! text against a static synonym table. Nothing here holds state.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;

/// Cap on actives inferred from a single ingredient list.
pub const MAX_INFERRED_ACTIVES: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveEntry {
    /// Display label, e.g. `Copper Peptides`.
    pub label: &'static str,
    /// Lower-cased canonical name the table is keyed by.
    pub canonical: &'static str,
    pub synonyms: &'static [&'static str],
}

pub const ACTIVE_TABLE: &[ActiveEntry] = &[
    ActiveEntry {
        label: "Copper Peptides",
        canonical: "copper peptides",
        synonyms: &["copper peptide", "copper tripeptide", "ghk-cu", "ghk cu", "蓝铜", "蓝铜肽"],
    },
    ActiveEntry {
        label: "Vitamin C",
        canonical: "vitamin c",
        synonyms: &[
            "ascorbic acid",
            "l-ascorbic",
            "ascorbyl",
            "ascorbate",
            "维c",
            "维生素c",
        ],
    },
    ActiveEntry {
        label: "Retinoid",
        canonical: "retinoid",
        synonyms: &[
            "retinol",
            "retinal",
            "retinaldehyde",
            "tretinoin",
            "adapalene",
            "retinoate",
            "a醇",
            "维a",
            "视黄",
            "阿达帕林",
        ],
    },
    ActiveEntry { label: "Niacinamide", canonical: "niacinamide", synonyms: &["烟酰胺"] },
    ActiveEntry {
        label: "Tranexamic Acid",
        canonical: "tranexamic acid",
        synonyms: &["传明酸", "氨甲环酸"],
    },
    ActiveEntry { label: "Arbutin", canonical: "arbutin", synonyms: &["alpha-arbutin", "熊果苷"] },
    ActiveEntry { label: "Kojic Acid", canonical: "kojic acid", synonyms: &["kojic", "曲酸"] },
    ActiveEntry { label: "Azelaic Acid", canonical: "azelaic acid", synonyms: &["azelaic", "壬二酸"] },
    ActiveEntry {
        label: "BHA (Salicylic Acid)",
        canonical: "salicylic acid",
        synonyms: &["bha", "betaine salicylate", "capryloyl salicylic", "水杨酸"],
    },
    ActiveEntry {
        label: "AHA (Glycolic/Lactic)",
        canonical: "glycolic acid",
        synonyms: &["lactic acid", "mandelic acid", "乙醇酸", "乳酸", "杏仁酸", "果酸"],
    },
    ActiveEntry {
        label: "Peptides",
        canonical: "peptides",
        synonyms: &["tripeptide", "hexapeptide", "palmitoyl", "多肽"],
    },
    ActiveEntry { label: "Panthenol (B5)", canonical: "panthenol", synonyms: &["泛醇"] },
    ActiveEntry { label: "Ceramides", canonical: "ceramides", synonyms: &["ceramide", "神经酰胺"] },
    ActiveEntry { label: "Cholesterol", canonical: "cholesterol", synonyms: &["胆固醇"] },
    ActiveEntry {
        label: "Centella",
        canonical: "centella",
        synonyms: &["madecassoside", "asiaticoside", "积雪草"],
    },
    ActiveEntry { label: "Allantoin", canonical: "allantoin", synonyms: &["尿囊素"] },
    ActiveEntry {
        label: "Hyaluronic Acid",
        canonical: "hyaluronic acid",
        synonyms: &["hyaluronic", "sodium hyaluronate", "透明质酸", "玻尿酸"],
    },
    ActiveEntry {
        label: "Benzoyl Peroxide",
        canonical: "benzoyl peroxide",
        synonyms: &["过氧化苯甲酰"],
    },
];

impl ActiveEntry {
    fn tokens(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.canonical).chain(self.synonyms.iter().copied())
    }

    fn names(&self, normalized: &str) -> bool {
        normalized == self.canonical
            || normalized.contains(self.canonical)
            || self.synonyms.iter().any(|synonym| *synonym == normalized)
    }
}

pub fn lookup_active(name: &str) -> Option<&'static ActiveEntry> {
    let normalized = normalize(name);
    if normalized.is_empty() {
        return None;
    }
    ACTIVE_TABLE.iter().find(|entry| entry.names(&normalized))
}

/// Lower-cased tokens for every name plus the known synonyms of each.
pub fn build_match_tokens<I, S>(active_names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = BTreeSet::new();

    for name in active_names {
        let normalized = normalize(name.as_ref());
        if normalized.is_empty() {
            continue;
        }
        if let Some(entry) = lookup_active(&normalized) {
            tokens.extend(entry.tokens().map(str::to_owned));
        }
        tokens.insert(normalized);
    }

    tokens
}

pub fn matches_any_token(text: &str, tokens: &BTreeSet<String>) -> bool {
    let haystack = fold(text);
    tokens.iter().any(|token| !token.is_empty() && haystack.contains(token.as_str()))
}

/// Canonical active labels found in free ingredient text, in table order.
pub fn infer_key_actives(ingredients_text: &str) -> Vec<String> {
    let haystack = fold(ingredients_text);
    if haystack.trim().is_empty() {
        return Vec::new();
    }

    ACTIVE_TABLE
        .iter()
        .filter(|entry| entry.tokens().any(|token| haystack.contains(token)))
        .map(|entry| entry.label.to_owned())
        .take(MAX_INFERRED_ACTIVES)
        .collect()
}

fn normalize(name: &str) -> String {
    fold(name.trim())
}

/// Full-width and compatibility forms collapse to their plain equivalents.
fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}
