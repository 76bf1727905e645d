//! AM/PM routine assembly
//!
//! Picks one product per step with a fixed per-category policy, places each
//! step in the morning and/or evening routine, prices the plan, and flags
//! known active-ingredient conflicts.

mod conflicts;

pub use conflicts::{
    detect_conflicts, step_haystack, ConflictRule, COPPER_PEPTIDE_VITAMIN_C_CONFLICT,
    DEFAULT_CONFLICT_RULES,
};

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::consultation::UserVector;
use crate::domain::product::{Category, SkuVector};
use crate::domain::recommendation::{RoutinePhase, RoutinePlan, RoutineStep, SkuScoreBreakdown};
use crate::scoring::{ScoreCalculator, SkuScorer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    Cheapest,
    HighestScore,
}

impl SelectionPolicy {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Cleanser | Category::Toner | Category::Sunscreen => Self::Cheapest,
            Category::Serum | Category::Treatment | Category::Moisturizer => Self::HighestScore,
        }
    }
}

pub fn phases_for(category: Category) -> &'static [RoutinePhase] {
    match category {
        Category::Cleanser | Category::Toner | Category::Moisturizer => {
            &[RoutinePhase::Am, RoutinePhase::Pm]
        }
        Category::Serum | Category::Sunscreen => &[RoutinePhase::Am],
        Category::Treatment => &[RoutinePhase::Pm],
    }
}

pub fn step_notes(category: Category) -> &'static [&'static str] {
    match category {
        Category::Serum => &["Apply on dry skin before moisturizer"],
        Category::Treatment => &["Introduce gradually, 2-3 nights per week"],
        Category::Sunscreen => &["Non-negotiable for brightening", "Reapply every 2 hours outdoors"],
        Category::Cleanser | Category::Toner | Category::Moisturizer => &[],
    }
}

#[derive(Clone, Debug)]
pub struct RoutineBuilder<S = ScoreCalculator> {
    scorer: S,
    conflict_rules: &'static [ConflictRule],
}

impl RoutineBuilder<ScoreCalculator> {
    pub fn new() -> Self {
        Self::with_scorer(ScoreCalculator::new())
    }
}

impl Default for RoutineBuilder<ScoreCalculator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SkuScorer> RoutineBuilder<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer, conflict_rules: DEFAULT_CONFLICT_RULES }
    }

    pub fn with_conflict_rules(mut self, rules: &'static [ConflictRule]) -> Self {
        self.conflict_rules = rules;
        self
    }

    pub fn build(&self, user: &UserVector, catalog: &[SkuVector]) -> RoutinePlan {
        let scored: Vec<(&SkuVector, SkuScoreBreakdown)> = catalog
            .iter()
            .map(|sku| (sku, self.scorer.score(sku, user)))
            .filter(|(_, score)| !score.vetoed)
            .collect();

        let mut plan = RoutinePlan::default();

        for category in Category::ALL {
            let Some(chosen) = select_for_category(&scored, category) else {
                continue;
            };

            let notes: Vec<String> =
                step_notes(category).iter().map(|note| (*note).to_owned()).collect();
            for phase in phases_for(category) {
                let step = RoutineStep { step: category, sku: chosen.clone(), notes: notes.clone() };
                match phase {
                    RoutinePhase::Am => plan.am.push(step),
                    RoutinePhase::Pm => plan.pm.push(step),
                }
            }
        }

        plan.estimated_total = unique_sku_total(plan.steps());
        plan.conflicts = detect_conflicts(plan.steps(), self.conflict_rules);

        info!(
            event_name = "engine.routine.built",
            catalog_size = catalog.len(),
            eligible = scored.len(),
            am_steps = plan.am.len(),
            pm_steps = plan.pm.len(),
            conflicts = plan.conflicts.len(),
            "routine assembled"
        );

        plan
    }
}

pub fn build_routine(user: &UserVector, catalog: &[SkuVector]) -> RoutinePlan {
    RoutineBuilder::new().build(user, catalog)
}

/// First-seen wins on ties under either policy.
fn select_for_category<'a>(
    scored: &[(&'a SkuVector, SkuScoreBreakdown)],
    category: Category,
) -> Option<&'a SkuVector> {
    let policy = SelectionPolicy::for_category(category);
    let mut best: Option<&(&'a SkuVector, SkuScoreBreakdown)> = None;

    for candidate in scored.iter().filter(|(sku, _)| sku.category == category) {
        let better = match best {
            None => true,
            Some((current, current_score)) => match policy {
                SelectionPolicy::Cheapest => candidate.0.price < current.price,
                SelectionPolicy::HighestScore => candidate.1.total > current_score.total,
            },
        };
        if better {
            best = Some(candidate);
        }
    }

    best.map(|(sku, _)| *sku)
}

/// Sum of prices over distinct SKU ids; a SKU used morning and evening is
/// charged once. Saturates at `Decimal::MAX` instead of overflowing.
pub fn unique_sku_total<'a, I>(steps: I) -> Decimal
where
    I: IntoIterator<Item = &'a RoutineStep>,
{
    let mut seen = HashSet::new();
    steps
        .into_iter()
        .filter(|step| seen.insert(step.sku.id.clone()))
        .map(|step| step.sku.price)
        .fold(Decimal::ZERO, |total, price| total.checked_add(price).unwrap_or(Decimal::MAX))
}
