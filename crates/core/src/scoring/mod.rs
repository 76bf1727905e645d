//! Product fit scoring
//!
//! Combines mechanism fit, social sentiment, and formulation quality into a
//! bounded 0..100 total, gated by a safety veto and reduced by an
//! environmental-stress penalty.

mod calculator;
pub mod stress;

pub use calculator::{normalized_platform_weights, ScoreCalculator, VetoReason};
pub use stress::{
    assess_stress, stress_penalty, StressAssessment, StressLookup, StressRejection,
    MAX_STRESS_PENALTY,
};

use crate::domain::consultation::UserVector;
use crate::domain::product::SkuVector;
use crate::domain::recommendation::SkuScoreBreakdown;

/// Weights for the three sub-scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Mechanism fit against the user's goals (default: 0.30)
    pub science: f64,
    /// Social sentiment across platforms (default: 0.60)
    pub social: f64,
    /// Formulation engineering quality (default: 0.10)
    pub engineering: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { science: 0.30, social: 0.60, engineering: 0.10 };

/// Burn rate above which an impaired-barrier user gets a veto.
pub const DEFAULT_BURN_RATE_VETO_THRESHOLD: f64 = 0.10;

/// Assumed usability penalty when engineering quality is unknown.
pub const DEFAULT_USABILITY_PENALTY: f64 = 0.5;

pub trait SkuScorer: Send + Sync {
    fn score(&self, sku: &SkuVector, user: &UserVector) -> SkuScoreBreakdown;
}
