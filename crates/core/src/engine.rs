use crate::config::AppConfig;
use crate::domain::consultation::UserVector;
use crate::domain::product::{SkuId, SkuVector};
use crate::domain::recommendation::{DupeMatch, RoutinePlan, SkuScoreBreakdown};
use crate::dupes::DupeMatcher;
use crate::errors::DomainError;
use crate::routine::{ConflictRule, RoutineBuilder, DEFAULT_CONFLICT_RULES};
use crate::scoring::ScoreCalculator;

pub trait RecommendationEngine: Send + Sync {
    fn score(&self, sku: &SkuVector, user: &UserVector) -> SkuScoreBreakdown;

    /// Dupes for the catalog entry with id `anchor_id`, restricted to the
    /// anchor's category class. An id listed twice with different contents
    /// is rejected.
    fn find_dupes(
        &self,
        anchor_id: &SkuId,
        catalog: &[SkuVector],
        limit: Option<usize>,
    ) -> Result<Vec<DupeMatch>, DomainError>;

    fn build_routine(&self, user: &UserVector, catalog: &[SkuVector]) -> RoutinePlan;
}

#[derive(Clone, Debug)]
pub struct DeterministicRecommendationEngine {
    calculator: ScoreCalculator,
    dupes: DupeMatcher,
    conflict_rules: &'static [ConflictRule],
}

impl DeterministicRecommendationEngine {
    pub fn new(calculator: ScoreCalculator, dupes: DupeMatcher) -> Self {
        Self { calculator, dupes, conflict_rules: DEFAULT_CONFLICT_RULES }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.scoring.calculator(), config.dupes.matcher())
    }

    pub fn with_conflict_rules(mut self, rules: &'static [ConflictRule]) -> Self {
        self.conflict_rules = rules;
        self
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }
}

impl Default for DeterministicRecommendationEngine {
    fn default() -> Self {
        Self::new(ScoreCalculator::new(), DupeMatcher::new())
    }
}

impl RecommendationEngine for DeterministicRecommendationEngine {
    fn score(&self, sku: &SkuVector, user: &UserVector) -> SkuScoreBreakdown {
        self.calculator.score(sku, user)
    }

    fn find_dupes(
        &self,
        anchor_id: &SkuId,
        catalog: &[SkuVector],
        limit: Option<usize>,
    ) -> Result<Vec<DupeMatch>, DomainError> {
        let mut listings = catalog.iter().filter(|sku| &sku.id == anchor_id);
        let anchor =
            listings.next().ok_or_else(|| DomainError::UnknownAnchor(anchor_id.clone()))?;
        if listings.any(|other| other != anchor) {
            return Err(DomainError::InvariantViolation(format!(
                "anchor id `{anchor_id}` maps to more than one distinct product"
            )));
        }

        Ok(self.dupes.find_in_class(anchor, catalog, limit))
    }

    fn build_routine(&self, user: &UserVector, catalog: &[SkuVector]) -> RoutinePlan {
        RoutineBuilder::with_scorer(self.calculator.clone())
            .with_conflict_rules(self.conflict_rules)
            .build(user, catalog)
    }
}
