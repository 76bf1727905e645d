use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::clamp01;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkuId(pub String);

impl fmt::Display for SkuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six efficacy axes shared by goals, scoring, and dupe similarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanismKey {
    OilControl,
    Soothing,
    Repair,
    Redness,
    Acne,
    Brightening,
}

impl MechanismKey {
    /// Fixed dense-vector order.
    pub const ALL: [MechanismKey; 6] = [
        MechanismKey::OilControl,
        MechanismKey::Soothing,
        MechanismKey::Repair,
        MechanismKey::Redness,
        MechanismKey::Acne,
        MechanismKey::Brightening,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OilControl => "oil_control",
            Self::Soothing => "soothing",
            Self::Repair => "repair",
            Self::Redness => "redness",
            Self::Acne => "acne",
            Self::Brightening => "brightening",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "oil_control" => Some(Self::OilControl),
            "soothing" => Some(Self::Soothing),
            "repair" | "barrier_repair" => Some(Self::Repair),
            "redness" => Some(Self::Redness),
            "acne" => Some(Self::Acne),
            "brightening" => Some(Self::Brightening),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismVector {
    pub oil_control: f64,
    pub soothing: f64,
    pub repair: f64,
    pub redness: f64,
    pub acne: f64,
    pub brightening: f64,
}

impl MechanismVector {
    /// Clamped value for one axis.
    pub fn get(&self, key: MechanismKey) -> f64 {
        let raw = match key {
            MechanismKey::OilControl => self.oil_control,
            MechanismKey::Soothing => self.soothing,
            MechanismKey::Repair => self.repair,
            MechanismKey::Redness => self.redness,
            MechanismKey::Acne => self.acne,
            MechanismKey::Brightening => self.brightening,
        };
        clamp01(raw)
    }

    pub fn set(&mut self, key: MechanismKey, value: f64) {
        let value = clamp01(value);
        match key {
            MechanismKey::OilControl => self.oil_control = value,
            MechanismKey::Soothing => self.soothing = value,
            MechanismKey::Repair => self.repair = value,
            MechanismKey::Redness => self.redness = value,
            MechanismKey::Acne => self.acne = value,
            MechanismKey::Brightening => self.brightening = value,
        }
    }

    pub fn to_dense(&self) -> [f64; 6] {
        MechanismKey::ALL.map(|key| self.get(key))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Texture {
    Watery,
    Gel,
    Lotion,
    Cream,
    Balm,
    Oil,
    Sticky,
    #[default]
    Unknown,
}

impl Texture {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "watery" | "water" | "essence" => Self::Watery,
            "gel" | "jelly" => Self::Gel,
            "lotion" | "milk" | "emulsion" => Self::Lotion,
            "cream" => Self::Cream,
            "balm" => Self::Balm,
            "oil" => Self::Oil,
            "sticky" | "tacky" => Self::Sticky,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Matte,
    #[default]
    Natural,
    Dewy,
}

impl Finish {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "matte" => Self::Matte,
            "dewy" | "glowy" => Self::Dewy,
            _ => Self::Natural,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceVector {
    pub texture: Texture,
    pub finish: Finish,
    pub pilling_risk: f64,
    pub stickiness: f64,
    /// Engineering-quality penalty in `[0, 1]`; unknown when absent.
    pub usability_penalty: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    HighIrritation,
    Alcohol,
    Fragrance,
}

impl RiskFlag {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high_irritation" => Some(Self::HighIrritation),
            "alcohol" | "alcohol_high" => Some(Self::Alcohol),
            "fragrance" => Some(Self::Fragrance),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Red,
    Reddit,
    Tiktok,
    Youtube,
}

impl Platform {
    pub const ALL: [Platform; 4] =
        [Platform::Red, Platform::Reddit, Platform::Tiktok, Platform::Youtube];
}

/// One number per social platform. Used for both platform scores and the
/// user's platform weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformValues {
    pub red: f64,
    pub reddit: f64,
    pub tiktok: f64,
    pub youtube: f64,
}

impl PlatformValues {
    pub fn get(&self, platform: Platform) -> f64 {
        match platform {
            Platform::Red => self.red,
            Platform::Reddit => self.reddit,
            Platform::Tiktok => self.tiktok,
            Platform::Youtube => self.youtube,
        }
    }

    pub fn set(&mut self, platform: Platform, value: f64) {
        match platform {
            Platform::Red => self.red = value,
            Platform::Reddit => self.reddit = value,
            Platform::Tiktok => self.tiktok = value,
            Platform::Youtube => self.youtube = value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialStats {
    pub platform_scores: PlatformValues,
    pub burn_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cleanser,
    Toner,
    Serum,
    Treatment,
    Moisturizer,
    Sunscreen,
}

impl Category {
    /// Routine step order.
    pub const ALL: [Category; 6] = [
        Category::Cleanser,
        Category::Toner,
        Category::Serum,
        Category::Treatment,
        Category::Moisturizer,
        Category::Sunscreen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleanser => "cleanser",
            Self::Toner => "toner",
            Self::Serum => "serum",
            Self::Treatment => "treatment",
            Self::Moisturizer => "moisturizer",
            Self::Sunscreen => "sunscreen",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cleanser" | "face_wash" | "wash" => Some(Self::Cleanser),
            "toner" | "essence" => Some(Self::Toner),
            "serum" => Some(Self::Serum),
            "treatment" | "spot_treatment" => Some(Self::Treatment),
            "moisturizer" | "moisturiser" | "cream" => Some(Self::Moisturizer),
            "sunscreen" | "spf" => Some(Self::Sunscreen),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkuVector {
    pub id: SkuId,
    pub brand: String,
    pub name: String,
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub currency: String,
    #[serde(default)]
    pub mechanism: MechanismVector,
    #[serde(default)]
    pub experience: ExperienceVector,
    #[serde(default)]
    pub risk_flags: BTreeSet<RiskFlag>,
    #[serde(default)]
    pub social_stats: SocialStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SkuVector {
    /// Lower-cased `brand name` used for token matching when actives are unknown.
    pub fn display_text(&self) -> String {
        format!("{} {}", self.brand, self.name).to_lowercase()
    }

    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.risk_flags.contains(&flag)
    }
}
