use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{MechanismKey, PlatformValues};

/// Schema tag an environmental-stress payload must carry to be trusted.
pub const ESS_SCHEMA_V1: &str = "aurora.ess.v1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    Oily,
    Dry,
    Combination,
    Sensitive,
    #[default]
    Normal,
}

impl SkinType {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "oily" => Self::Oily,
            "dry" => Self::Dry,
            "combination" | "combo" => Self::Combination,
            "sensitive" => Self::Sensitive,
            _ => Self::Normal,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierStatus {
    #[default]
    Healthy,
    Impaired,
}

impl BarrierStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "impaired" | "damaged" | "compromised" => Self::Impaired,
            _ => Self::Healthy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserGoal {
    pub track: MechanismKey,
    /// 1 is the most important goal. Zero or negative counts as weight 1.
    pub priority: i32,
}

impl UserGoal {
    pub const fn new(track: MechanismKey, priority: i32) -> Self {
        Self { track, priority }
    }

    pub fn weight(&self) -> f64 {
        if self.priority > 0 {
            1.0 / f64::from(self.priority)
        } else {
            1.0
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressTier {
    Low,
    Moderate,
    High,
    Severe,
    #[default]
    Unknown,
}

impl StressTier {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "moderate" | "medium" => Self::Moderate,
            "high" => Self::High,
            "severe" | "extreme" => Self::Severe,
            _ => Self::Unknown,
        }
    }
}

/// Stress summary produced by the environmental provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvStressOutput {
    pub schema: String,
    pub ess: Option<f64>,
    #[serde(default)]
    pub tier: StressTier,
    #[serde(default)]
    pub contributors: Vec<String>,
    #[serde(default)]
    pub missing_inputs: Vec<String>,
}

impl EnvStressOutput {
    pub fn v1(ess: f64, tier: StressTier) -> Self {
        Self {
            schema: ESS_SCHEMA_V1.to_owned(),
            ess: Some(ess),
            tier,
            contributors: Vec::new(),
            missing_inputs: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserVector {
    #[serde(default)]
    pub skin_type: SkinType,
    #[serde(default)]
    pub barrier_status: BarrierStatus,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub goals: Vec<UserGoal>,
    #[serde(default)]
    pub platform_weights: PlatformValues,
    #[serde(default)]
    pub env_stress: Option<EnvStressOutput>,
}

/// Baseline consultation handed to callers that have no user input yet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConsultationDefaults {
    pub skin_type: SkinType,
    pub barrier_status: BarrierStatus,
    pub goals: &'static [UserGoal],
    pub platform_weights: PlatformValues,
}

pub const DEFAULT_CONSULTATION: ConsultationDefaults = ConsultationDefaults {
    skin_type: SkinType::Combination,
    barrier_status: BarrierStatus::Healthy,
    goals: &[
        UserGoal::new(MechanismKey::OilControl, 1),
        UserGoal::new(MechanismKey::Soothing, 2),
    ],
    platform_weights: PlatformValues { red: 0.5, reddit: 0.5, tiktok: 0.0, youtube: 0.0 },
};

impl ConsultationDefaults {
    pub fn to_user_vector(&self) -> UserVector {
        UserVector {
            skin_type: self.skin_type,
            barrier_status: self.barrier_status,
            budget: None,
            goals: self.goals.to_vec(),
            platform_weights: self.platform_weights,
            env_stress: None,
        }
    }
}

impl From<ConsultationDefaults> for UserVector {
    fn from(defaults: ConsultationDefaults) -> Self {
        defaults.to_user_vector()
    }
}
