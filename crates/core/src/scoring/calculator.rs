//! Science / social / engineering sub-scores, veto gate, and aggregation.

use tracing::debug;

use super::stress::assess_stress;
use super::{
    ScoringWeights, SkuScorer, DEFAULT_BURN_RATE_VETO_THRESHOLD, DEFAULT_USABILITY_PENALTY,
};
use crate::domain::consultation::{BarrierStatus, UserVector};
use crate::domain::product::{Platform, PlatformValues, RiskFlag, SkuVector};
use crate::domain::recommendation::SkuScoreBreakdown;
use crate::numeric::{clamp01, clamp100, weighted_average};

/// Why a product was removed from consideration for this user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VetoReason {
    HighIrritation,
    BurnRate { burn_rate: f64, threshold: f64 },
}

impl VetoReason {
    pub fn message(&self) -> String {
        match self {
            Self::HighIrritation => {
                "Vetoed: high-irritation actives are unsafe while the skin barrier is impaired"
                    .to_owned()
            }
            Self::BurnRate { burn_rate, threshold } => format!(
                "Vetoed: reported burn rate {:.0}% exceeds the {:.0}% limit for an impaired barrier",
                burn_rate * 100.0,
                threshold * 100.0
            ),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
    burn_rate_veto_threshold: f64,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self {
            weights: ScoringWeights::default(),
            burn_rate_veto_threshold: DEFAULT_BURN_RATE_VETO_THRESHOLD,
        }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights, ..Self::new() }
    }

    pub fn with_burn_rate_veto_threshold(mut self, threshold: f64) -> Self {
        self.burn_rate_veto_threshold = clamp01(threshold);
        self
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Priority-weighted mean of the goal tracks, scaled to 0..100.
    pub fn science_score(&self, sku: &SkuVector, user: &UserVector) -> f64 {
        let pairs = user.goals.iter().map(|goal| (goal.weight(), sku.mechanism.get(goal.track)));
        clamp100(weighted_average(pairs).unwrap_or(0.0) * 100.0)
    }

    pub fn social_score(&self, sku: &SkuVector, user: &UserVector) -> f64 {
        let weights = normalized_platform_weights(&user.platform_weights);
        let blended: f64 = Platform::ALL
            .iter()
            .map(|platform| {
                weights.get(*platform) * clamp01(sku.social_stats.platform_scores.get(*platform))
            })
            .sum();
        clamp100(blended * 100.0)
    }

    pub fn engineering_score(&self, sku: &SkuVector) -> f64 {
        let penalty = sku.experience.usability_penalty.unwrap_or(DEFAULT_USABILITY_PENALTY);
        clamp100(100.0 * (1.0 - 0.5 * clamp01(penalty)))
    }

    /// The irritation flag takes precedence when both conditions hold.
    pub fn veto(&self, sku: &SkuVector, user: &UserVector) -> Option<VetoReason> {
        if user.barrier_status != BarrierStatus::Impaired {
            return None;
        }
        if sku.has_flag(RiskFlag::HighIrritation) {
            return Some(VetoReason::HighIrritation);
        }

        let burn_rate = clamp01(sku.social_stats.burn_rate);
        if burn_rate > self.burn_rate_veto_threshold {
            return Some(VetoReason::BurnRate {
                burn_rate,
                threshold: self.burn_rate_veto_threshold,
            });
        }

        None
    }

    pub fn score(&self, sku: &SkuVector, user: &UserVector) -> SkuScoreBreakdown {
        let science = self.science_score(sku, user);
        let social = self.social_score(sku, user);
        let engineering = self.engineering_score(sku);

        if let Some(reason) = self.veto(sku, user) {
            let message = reason.message();
            debug!(
                event_name = "engine.score.vetoed",
                sku_id = %sku.id,
                reason = %message,
                "product vetoed for user"
            );
            return SkuScoreBreakdown {
                sku_id: sku.id.clone(),
                science,
                social,
                engineering,
                stress_penalty: 0.0,
                total: 0.0,
                vetoed: true,
                veto_reason: Some(message.clone()),
                reasons: vec![message],
            };
        }

        let base = self.weights.science * science
            + self.weights.social * social
            + self.weights.engineering * engineering;
        let stress = assess_stress(user.env_stress.as_ref());
        let total = clamp100(base - stress.penalty);

        SkuScoreBreakdown {
            sku_id: sku.id.clone(),
            science,
            social,
            engineering,
            stress_penalty: stress.penalty,
            total,
            vetoed: false,
            veto_reason: None,
            reasons: self.reasoning(sku, user, social, stress.penalty),
        }
    }

    fn reasoning(
        &self,
        sku: &SkuVector,
        user: &UserVector,
        social: f64,
        stress_penalty: f64,
    ) -> Vec<String> {
        let mut reasons = Vec::new();

        if let Some(goal) = user.goals.iter().min_by_key(|goal| goal.priority.max(1)) {
            let fit = sku.mechanism.get(goal.track);
            if fit >= 0.7 {
                reasons.push(format!("Strong {} fit ({:.0}/100)", goal.track.as_str(), fit * 100.0));
            } else if fit < 0.3 {
                reasons.push(format!("Weak {} fit ({:.0}/100)", goal.track.as_str(), fit * 100.0));
            }
        }

        if social >= 70.0 {
            reasons.push("Well reviewed on your preferred platforms".to_string());
        }

        if sku.experience.usability_penalty.is_none() {
            reasons.push("Formulation quality unknown; engineering scored neutral".to_string());
        }

        if stress_penalty > 0.0 {
            reasons.push(format!("Environmental stress adjustment -{stress_penalty:.1}"));
        }

        if reasons.is_empty() {
            reasons.push("Based on your consultation profile".to_string());
        }

        reasons
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SkuScorer for ScoreCalculator {
    fn score(&self, sku: &SkuVector, user: &UserVector) -> SkuScoreBreakdown {
        ScoreCalculator::score(self, sku, user)
    }
}

/// Weights over the four platforms summing to 1. Falls back to an even
/// RED/Reddit split when nothing positive was supplied.
pub fn normalized_platform_weights(raw: &PlatformValues) -> PlatformValues {
    let mut positive = PlatformValues::default();
    let mut sum = 0.0;
    for platform in Platform::ALL {
        let weight = raw.get(platform);
        if weight.is_finite() && weight > 0.0 {
            positive.set(platform, weight);
            sum += weight;
        }
    }

    if sum <= 0.0 || !sum.is_finite() {
        return PlatformValues { red: 0.5, reddit: 0.5, tiktok: 0.0, youtube: 0.0 };
    }

    let mut normalized = PlatformValues::default();
    for platform in Platform::ALL {
        normalized.set(platform, positive.get(platform) / sum);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;

    use super::{normalized_platform_weights, ScoreCalculator, VetoReason};
    use crate::domain::consultation::{
        BarrierStatus, EnvStressOutput, SkinType, StressTier, UserGoal, UserVector,
    };
    use crate::domain::product::{
        Category, ExperienceVector, MechanismKey, MechanismVector, PlatformValues, RiskFlag,
        SkuId, SkuVector, SocialStats,
    };
    use crate::scoring::ScoringWeights;

    #[test]
    fn science_score_weights_goals_by_inverse_priority() {
        let calculator = ScoreCalculator::new();
        let sku = sku_fixture();
        let user = user_fixture(BarrierStatus::Healthy);

        // (1.0 * 0.8 + 0.5 * 0.2) / 1.5 = 0.6
        assert!((calculator.science_score(&sku, &user) - 60.0).abs() < 1e-9);

        let no_goals = UserVector { goals: Vec::new(), ..user };
        assert_eq!(calculator.science_score(&sku, &no_goals), 0.0);
    }

    #[test]
    fn social_weights_default_to_red_and_reddit_split() {
        let fallback = normalized_platform_weights(&PlatformValues {
            red: 0.0,
            reddit: -1.0,
            tiktok: 0.0,
            youtube: 0.0,
        });
        assert_eq!(fallback.red, 0.5);
        assert_eq!(fallback.reddit, 0.5);
        assert_eq!(fallback.tiktok, 0.0);

        let weighted = normalized_platform_weights(&PlatformValues {
            red: 3.0,
            reddit: 1.0,
            tiktok: 0.0,
            youtube: f64::NAN,
        });
        assert!((weighted.red - 0.75).abs() < 1e-9);
        assert!((weighted.reddit - 0.25).abs() < 1e-9);
        assert_eq!(weighted.youtube, 0.0);
    }

    #[test]
    fn unknown_usability_scores_neutral_engineering() {
        let calculator = ScoreCalculator::new();
        let mut sku = sku_fixture();
        assert_eq!(calculator.engineering_score(&sku), 75.0);

        sku.experience.usability_penalty = Some(0.0);
        assert_eq!(calculator.engineering_score(&sku), 100.0);
        sku.experience.usability_penalty = Some(4.0);
        assert_eq!(calculator.engineering_score(&sku), 50.0);
    }

    #[test]
    fn aggregate_uses_default_weights() {
        let calculator = ScoreCalculator::new();
        let sku = sku_fixture();
        let user = user_fixture(BarrierStatus::Healthy);
        let score = calculator.score(&sku, &user);

        // social = 0.5 * 0.9 + 0.5 * 0.7 = 0.8
        let expected = 0.3 * 60.0 + 0.6 * 80.0 + 0.1 * 75.0;
        assert!(!score.vetoed);
        assert!((score.total - expected).abs() < 1e-9);
        assert!(!score.reasons.is_empty());
    }

    #[test]
    fn impaired_barrier_vetoes_irritating_products_but_keeps_sub_scores() {
        let calculator = ScoreCalculator::new();
        let mut sku = sku_fixture();
        sku.risk_flags = BTreeSet::from([RiskFlag::Alcohol, RiskFlag::HighIrritation]);
        sku.social_stats.burn_rate = 0.4;
        let user = user_fixture(BarrierStatus::Impaired);

        let score = calculator.score(&sku, &user);
        assert!(score.vetoed);
        assert_eq!(score.total, 0.0);
        assert!(score.science > 0.0 && score.social > 0.0 && score.engineering > 0.0);
        assert_eq!(score.veto_reason, Some(VetoReason::HighIrritation.message()));
    }

    #[test]
    fn burn_rate_veto_only_applies_above_threshold() {
        let calculator = ScoreCalculator::new();
        let user = user_fixture(BarrierStatus::Impaired);
        let mut sku = sku_fixture();

        sku.social_stats.burn_rate = 0.1;
        assert!(!calculator.score(&sku, &user).vetoed);

        sku.social_stats.burn_rate = 0.15;
        let score = calculator.score(&sku, &user);
        assert!(score.vetoed);
        assert!(score.veto_reason.as_deref().unwrap_or_default().contains("burn rate 15%"));

        let healthy = user_fixture(BarrierStatus::Healthy);
        assert!(!calculator.score(&sku, &healthy).vetoed);
    }

    #[test]
    fn stress_penalty_never_touches_sub_scores_or_vetoed_totals() {
        let calculator = ScoreCalculator::new();
        let sku = sku_fixture();
        let mut user = user_fixture(BarrierStatus::Healthy);
        let base = calculator.score(&sku, &user);

        user.env_stress = Some(EnvStressOutput::v1(50.0, StressTier::High));
        let stressed = calculator.score(&sku, &user);
        assert_eq!(stressed.science, base.science);
        assert_eq!(stressed.social, base.social);
        assert_eq!(stressed.engineering, base.engineering);
        assert!((base.total - stressed.total - 5.0).abs() < 1e-9);

        let mut risky = sku_fixture();
        risky.risk_flags.insert(RiskFlag::HighIrritation);
        user.barrier_status = BarrierStatus::Impaired;
        let vetoed = calculator.score(&risky, &user);
        assert_eq!(vetoed.total, 0.0);
        assert_eq!(vetoed.stress_penalty, 0.0);
    }

    #[test]
    fn custom_weights_are_respected() {
        let calculator = ScoreCalculator::with_weights(ScoringWeights {
            science: 1.0,
            social: 0.0,
            engineering: 0.0,
        });
        let score = calculator.score(&sku_fixture(), &user_fixture(BarrierStatus::Healthy));
        assert!((score.total - 60.0).abs() < 1e-9);
    }

    fn sku_fixture() -> SkuVector {
        SkuVector {
            id: SkuId("sku-niacinamide".to_owned()),
            brand: "The Ordinary".to_owned(),
            name: "Niacinamide 10% + Zinc 1%".to_owned(),
            category: Category::Serum,
            price: Decimal::new(590, 2),
            currency: "USD".to_owned(),
            mechanism: MechanismVector {
                oil_control: 0.8,
                soothing: 0.2,
                ..MechanismVector::default()
            },
            experience: ExperienceVector::default(),
            risk_flags: BTreeSet::new(),
            social_stats: SocialStats {
                platform_scores: PlatformValues { red: 0.9, reddit: 0.7, tiktok: 0.4, youtube: 0.0 },
                burn_rate: 0.02,
            },
            actives: vec!["Niacinamide".to_owned()],
            notes: None,
        }
    }

    fn user_fixture(barrier_status: BarrierStatus) -> UserVector {
        UserVector {
            skin_type: SkinType::Oily,
            barrier_status,
            budget: None,
            goals: vec![
                UserGoal::new(MechanismKey::OilControl, 1),
                UserGoal::new(MechanismKey::Soothing, 2),
            ],
            platform_weights: PlatformValues::default(),
            env_stress: None,
        }
    }
}
