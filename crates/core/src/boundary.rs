//! Coercion of loose upstream JSON into the engine's strict types.
//!
//! Catalog rows and consultation payloads arrive as whatever the database
//! or an LLM produced. Every reader here clamps, defaults, or falls back
//! instead of failing; the only thing that drops data is a catalog row with
//! no usable id or category.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::warn;

use crate::actives::infer_key_actives;
use crate::domain::consultation::{
    BarrierStatus, EnvStressOutput, SkinType, StressTier, UserGoal, UserVector,
};
use crate::domain::product::{
    Category, ExperienceVector, Finish, MechanismKey, MechanismVector, Platform, PlatformValues,
    RiskFlag, SkuId, SkuVector, SocialStats, Texture,
};
use crate::numeric::clamp01;
use crate::scoring::StressLookup;

pub const DEFAULT_CURRENCY: &str = "USD";

pub fn sku_from_json(value: &Value) -> Option<SkuVector> {
    let object = value.as_object()?;

    let Some(id) = object.get("id").and_then(identifier) else {
        warn!(event_name = "engine.boundary.sku_dropped", reason = "missing_id", "catalog row skipped");
        return None;
    };
    let Some(category) = text(object, &["category", "step"]).and_then(|raw| Category::parse(&raw))
    else {
        warn!(
            event_name = "engine.boundary.sku_dropped",
            sku_id = %id,
            reason = "unknown_category",
            "catalog row skipped"
        );
        return None;
    };

    let actives = match object.get("actives").or_else(|| object.get("key_actives")) {
        Some(raw) => string_list(raw),
        None => text(object, &["ingredients", "ingredients_text"])
            .map(|ingredients| infer_key_actives(&ingredients))
            .unwrap_or_default(),
    };

    Some(SkuVector {
        id,
        brand: text(object, &["brand"]).unwrap_or_default(),
        name: text(object, &["name", "product_name"]).unwrap_or_default(),
        category,
        price: object.get("price").map(price).unwrap_or(Decimal::ZERO),
        currency: text(object, &["currency"])
            .map(|currency| currency.to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
        mechanism: object.get("mechanism").map(mechanism).unwrap_or_default(),
        experience: object
            .get("experience")
            .or_else(|| object.get("experience_prediction"))
            .map(experience)
            .unwrap_or_default(),
        risk_flags: object.get("risk_flags").map(risk_flags).unwrap_or_default(),
        social_stats: object.get("social_stats").map(social_stats).unwrap_or_default(),
        actives,
        notes: text(object, &["notes"]),
    })
}

/// Rows without an id or a known category are skipped; everything else is
/// normalized.
pub fn catalog_from_json(value: &Value) -> Vec<SkuVector> {
    let rows = match value {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(object) => match object.get("catalog").or_else(|| object.get("skus")) {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => std::slice::from_ref(value),
        },
        _ => &[],
    };

    rows.iter().filter_map(sku_from_json).collect()
}

pub fn user_from_json(value: &Value) -> UserVector {
    let empty = Map::new();
    let object = value.as_object().unwrap_or(&empty);

    UserVector {
        skin_type: text(object, &["skin_type"])
            .map(|raw| SkinType::from_raw(&raw))
            .unwrap_or_default(),
        barrier_status: text(object, &["barrier_status"])
            .map(|raw| BarrierStatus::from_raw(&raw))
            .unwrap_or_default(),
        budget: object
            .get("budget")
            .and_then(number)
            .filter(|budget| *budget >= 0.0)
            .and_then(|budget| Decimal::try_from(budget).ok()),
        goals: object.get("goals").map(goals).unwrap_or_default(),
        platform_weights: object.get("platform_weights").map(platform_values).unwrap_or_default(),
        env_stress: object.get("env_stress").and_then(env_stress_from_json),
    }
}

/// `None` for null and non-objects. Only a JSON number counts as `ess`;
/// strings, even numeric ones, leave it absent. The schema tag is kept
/// verbatim, schema and range checks happen in the penalty adapter.
pub fn env_stress_from_json(value: &Value) -> Option<EnvStressOutput> {
    let object = value.as_object()?;

    Some(EnvStressOutput {
        schema: ["schema", "schema_version"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_default(),
        ess: object.get("ess").and_then(Value::as_f64),
        tier: text(object, &["tier"]).map(|raw| StressTier::from_raw(&raw)).unwrap_or_default(),
        contributors: object.get("contributors").map(string_list).unwrap_or_default(),
        missing_inputs: object.get("missing_inputs").map(string_list).unwrap_or_default(),
    })
}

/// Resolves a fallible stress accessor into what scoring consumes. A failing
/// accessor is logged and treated as absent.
pub fn resolve_env_stress<F, E>(accessor: F) -> Option<EnvStressOutput>
where
    F: FnOnce() -> Result<Option<Value>, E>,
    E: fmt::Display,
{
    StressLookup::from_accessor(|| {
        accessor().map(|payload| payload.as_ref().and_then(env_stress_from_json))
    })
    .into_option()
}

fn identifier(value: &Value) -> Option<SkuId> {
    match value {
        Value::String(raw) if !raw.trim().is_empty() => Some(SkuId(raw.trim().to_owned())),
        Value::Number(raw) => Some(SkuId(raw.to_string())),
        _ => None,
    }
}

fn text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::String(raw) if !raw.trim().is_empty() => Some(raw.trim().to_owned()),
            Value::Number(raw) => Some(raw.to_string()),
            _ => None,
        })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(raw) => raw.as_f64(),
        Value::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn unit(value: Option<&Value>) -> f64 {
    value.and_then(number).map(clamp01).unwrap_or(0.0)
}

fn price(value: &Value) -> Decimal {
    let parsed = match value {
        Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
        other => number(other)
            .filter(|price| price.is_finite())
            .and_then(|price| Decimal::try_from(price).ok()),
    };

    match parsed {
        Some(price) if price >= Decimal::ZERO => price,
        _ => Decimal::ZERO,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(raw) => Some(raw.trim().to_owned()),
                Value::Object(object) => text(object, &["name", "key", "label"]),
                _ => None,
            })
            .filter(|item| !item.is_empty())
            .collect(),
        Value::String(raw) => raw
            .split([',', '|', ';', '，'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn mechanism(value: &Value) -> MechanismVector {
    let mut vector = MechanismVector::default();
    if let Some(object) = value.as_object() {
        for (key, raw) in object {
            if let Some(track) = MechanismKey::parse(key) {
                vector.set(track, unit(Some(raw)));
            }
        }
    }
    vector
}

fn experience(value: &Value) -> ExperienceVector {
    let Some(object) = value.as_object() else {
        return ExperienceVector::default();
    };

    ExperienceVector {
        texture: text(object, &["texture"]).map(|raw| Texture::from_raw(&raw)).unwrap_or_default(),
        finish: text(object, &["finish"]).map(|raw| Finish::from_raw(&raw)).unwrap_or_default(),
        pilling_risk: unit(object.get("pilling_risk")),
        stickiness: unit(object.get("stickiness")),
        usability_penalty: object.get("usability_penalty").and_then(number).map(clamp01),
    }
}

fn risk_flags(value: &Value) -> BTreeSet<RiskFlag> {
    string_list(value).iter().filter_map(|raw| RiskFlag::parse(raw)).collect()
}

fn platform_values(value: &Value) -> PlatformValues {
    let mut values = PlatformValues::default();
    if let Some(object) = value.as_object() {
        for platform in Platform::ALL {
            let key = match platform {
                Platform::Red => "red",
                Platform::Reddit => "reddit",
                Platform::Tiktok => "tiktok",
                Platform::Youtube => "youtube",
            };
            if let Some(raw) = object.get(key).and_then(number).filter(|raw| raw.is_finite()) {
                values.set(platform, raw);
            }
        }
    }
    values
}

/// Accepts `platform_scores` on a 0..1 scale, or the legacy flat
/// `red_score` / `reddit_score` columns on a 0..100 scale.
fn social_stats(value: &Value) -> SocialStats {
    let Some(object) = value.as_object() else {
        return SocialStats::default();
    };

    let mut platform_scores = object
        .get("platform_scores")
        .map(platform_values)
        .unwrap_or_default();
    if object.get("platform_scores").is_none() {
        platform_scores.red = object.get("red_score").and_then(number).unwrap_or(0.0) / 100.0;
        platform_scores.reddit = object.get("reddit_score").and_then(number).unwrap_or(0.0) / 100.0;
    }
    for platform in Platform::ALL {
        platform_scores.set(platform, clamp01(platform_scores.get(platform)));
    }

    SocialStats {
        platform_scores,
        burn_rate: unit(object.get("burn_rate").or_else(|| object.get("burnRate"))),
    }
}

fn goals(value: &Value) -> Vec<UserGoal> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let fallback_priority = i32::try_from(index + 1).unwrap_or(i32::MAX);
            match item {
                Value::String(raw) => {
                    MechanismKey::parse(raw).map(|track| UserGoal::new(track, fallback_priority))
                }
                Value::Object(object) => {
                    let track = text(object, &["track", "goal"])
                        .and_then(|raw| MechanismKey::parse(&raw))?;
                    let priority = object
                        .get("priority")
                        .and_then(number)
                        .filter(|priority| priority.is_finite())
                        .map(|priority| priority.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
                        .unwrap_or(fallback_priority);
                    Some(UserGoal::new(track, priority))
                }
                _ => None,
            }
        })
        .collect()
}
