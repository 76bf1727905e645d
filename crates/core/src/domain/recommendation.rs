use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{Category, SkuId, SkuVector};

/// Explainable score for one product. All values are on a 0..100 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkuScoreBreakdown {
    pub sku_id: SkuId,
    pub science: f64,
    pub social: f64,
    pub engineering: f64,
    /// Points removed from `total` for environmental stress.
    pub stress_penalty: f64,
    pub total: f64,
    pub vetoed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veto_reason: Option<String>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DupeMatch {
    pub sku: SkuVector,
    pub similarity: f64,
    pub tradeoff_note: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutinePhase {
    Am,
    Pm,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutineStep {
    pub step: Category,
    pub sku: SkuVector,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutinePlan {
    pub am: Vec<RoutineStep>,
    pub pm: Vec<RoutineStep>,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_total: Decimal,
    pub conflicts: Vec<String>,
}

impl RoutinePlan {
    pub fn steps(&self) -> impl Iterator<Item = &RoutineStep> {
        self.am.iter().chain(self.pm.iter())
    }

    pub fn phase(&self, phase: RoutinePhase) -> &[RoutineStep] {
        match phase {
            RoutinePhase::Am => &self.am,
            RoutinePhase::Pm => &self.pm,
        }
    }
}
