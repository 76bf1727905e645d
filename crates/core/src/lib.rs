pub mod actives;
pub mod boundary;
pub mod config;
pub mod domain;
pub mod dupes;
pub mod engine;
pub mod errors;
pub mod numeric;
pub mod routine;
pub mod scoring;

pub use actives::{infer_key_actives, lookup_active, ActiveEntry, ACTIVE_TABLE};
pub use boundary::{catalog_from_json, env_stress_from_json, sku_from_json, user_from_json};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::consultation::{
    BarrierStatus, EnvStressOutput, SkinType, StressTier, UserGoal, UserVector,
    DEFAULT_CONSULTATION, ESS_SCHEMA_V1,
};
pub use domain::product::{
    Category, ExperienceVector, Finish, MechanismKey, MechanismVector, Platform, PlatformValues,
    RiskFlag, SkuId, SkuVector, SocialStats, Texture,
};
pub use domain::recommendation::{
    DupeMatch, RoutinePhase, RoutinePlan, RoutineStep, SkuScoreBreakdown,
};
pub use dupes::{find_dupes, find_dupes_in_class, DupeClass, DupeMatcher, DEFAULT_DUPE_LIMIT};
pub use engine::{DeterministicRecommendationEngine, RecommendationEngine};
pub use errors::{ApplicationError, DomainError};
pub use routine::{build_routine, ConflictRule, RoutineBuilder, DEFAULT_CONFLICT_RULES};
pub use scoring::{
    ScoreCalculator, ScoringWeights, SkuScorer, StressLookup, DEFAULT_WEIGHTS,
};
