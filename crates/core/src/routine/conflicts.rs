use crate::actives::{build_match_tokens, matches_any_token};
use crate::domain::recommendation::RoutineStep;

/// A known incompatible pairing. Fires when any step references a token of
/// `left` and any step (the same or another) references a token of `right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConflictRule {
    pub left: &'static [&'static str],
    pub right: &'static [&'static str],
    pub message: &'static str,
}

pub const COPPER_PEPTIDE_VITAMIN_C_CONFLICT: &str =
    "Copper peptides and vitamin C can destabilize each other; use them at different times of day or on alternate days.";

pub const DEFAULT_CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        left: &["copper peptides"],
        right: &["vitamin c"],
        message: COPPER_PEPTIDE_VITAMIN_C_CONFLICT,
    },
    ConflictRule {
        left: &["retinoid"],
        right: &["glycolic acid", "salicylic acid"],
        message: "Retinoids with AHA/BHA exfoliants raise irritation risk; alternate nights instead of layering.",
    },
    ConflictRule {
        left: &["benzoyl peroxide"],
        right: &["retinoid"],
        message: "Benzoyl peroxide can oxidize retinoids; apply them in separate routines.",
    },
];

impl ConflictRule {
    pub fn matches(&self, haystacks: &[String]) -> bool {
        let left = build_match_tokens(self.left.iter());
        let right = build_match_tokens(self.right.iter());

        haystacks.iter().any(|text| matches_any_token(text, &left))
            && haystacks.iter().any(|text| matches_any_token(text, &right))
    }
}

/// Text searched for each step: its listed actives, or brand and name when
/// the product lists none.
pub fn step_haystack(step: &RoutineStep) -> String {
    if step.sku.actives.is_empty() {
        step.sku.display_text()
    } else {
        step.sku.actives.join(" | ").to_lowercase()
    }
}

/// Advisory messages for every rule that fires, each at most once, in table
/// order.
pub fn detect_conflicts<'a, I>(steps: I, rules: &[ConflictRule]) -> Vec<String>
where
    I: IntoIterator<Item = &'a RoutineStep>,
{
    let haystacks: Vec<String> = steps.into_iter().map(step_haystack).collect();
    let mut conflicts: Vec<String> = Vec::new();

    for rule in rules {
        if rule.matches(&haystacks) && !conflicts.iter().any(|existing| existing == rule.message) {
            conflicts.push(rule.message.to_owned());
        }
    }

    conflicts
}
