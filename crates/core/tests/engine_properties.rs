use aurora_core::boundary::{catalog_from_json, resolve_env_stress, user_from_json};
use aurora_core::routine::COPPER_PEPTIDE_VITAMIN_C_CONFLICT;
use aurora_core::{
    build_routine, find_dupes, BarrierStatus, Category, DeterministicRecommendationEngine,
    EnvStressOutput, RecommendationEngine, ScoreCalculator, SkuId, SkuVector, StressTier,
    UserVector, ESS_SCHEMA_V1,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};

fn catalog() -> Vec<SkuVector> {
    catalog_from_json(&json!([
        {
            "id": "cleanser-gentle",
            "brand": "Haven",
            "name": "Low pH Gel Cleanser",
            "category": "cleanser",
            "price": 12.5,
            "mechanism": { "soothing": 0.6, "repair": 0.3 },
            "social_stats": { "platform_scores": { "red": 0.7, "reddit": 0.8 } }
        },
        {
            "id": "serum-vc",
            "brand": "Lumen",
            "name": "Ascorbic Serum 15%",
            "category": "serum",
            "price": 34,
            "mechanism": { "brightening": 0.9, "redness": 0.2 },
            "actives": ["Vitamin C", "Ferulic Acid"],
            "social_stats": { "platform_scores": { "red": 0.9, "reddit": 0.7 } }
        },
        {
            "id": "treatment-cu",
            "brand": "Buffet Lab",
            "name": "Copper Peptide Night Treatment",
            "category": "treatment",
            "price": 29,
            "mechanism": { "repair": 0.8, "soothing": 0.4 },
            "actives": ["Copper Peptides"],
            "social_stats": { "platform_scores": { "red": 0.6, "reddit": 0.9 } }
        },
        {
            "id": "moisturizer-cer",
            "brand": "Haven",
            "name": "Ceramide Barrier Cream",
            "category": "moisturizer",
            "price": 22,
            "mechanism": { "repair": 0.9, "soothing": 0.5 },
            "experience": { "texture": "cream", "finish": "natural" },
            "social_stats": { "platform_scores": { "red": 0.8, "reddit": 0.8 } }
        }
    ]))
}

fn user(env_stress: Value) -> UserVector {
    user_from_json(&json!({
        "skin_type": "combination",
        "barrier_status": "healthy",
        "goals": [{ "track": "repair", "priority": 1 }, { "track": "brightening", "priority": 2 }],
        "platform_weights": { "red": 0.5, "reddit": 0.5 },
        "env_stress": env_stress
    }))
}

fn sku(id: &str) -> SkuVector {
    match catalog().into_iter().find(|sku| sku.id == SkuId(id.to_owned())) {
        Some(sku) => sku,
        None => panic!("fixture sku `{id}` missing"),
    }
}

#[test]
fn impaired_barrier_vetoes_irritating_alcohol_serum() {
    let risky = catalog_from_json(&json!([{
        "id": "risky-serum",
        "category": "serum",
        "price": 30,
        "mechanism": { "brightening": 1.0 },
        "risk_flags": ["alcohol", "high_irritation"],
        "social_stats": { "platform_scores": { "red": 1.0, "reddit": 1.0 } }
    }]));
    let mut impaired = user(Value::Null);
    impaired.barrier_status = BarrierStatus::Impaired;

    let score = ScoreCalculator::new().score(&risky[0], &impaired);

    assert!(score.vetoed);
    assert_eq!(score.total, 0.0);
    assert!(score.veto_reason.is_some());
    assert!(score.science > 0.0, "sub-scores stay populated for vetoed products");
}

#[test]
fn stress_penalty_is_bounded_and_monotone() {
    let calculator = ScoreCalculator::new();
    let product = sku("moisturizer-cer");
    let base = calculator.score(&product, &user(Value::Null)).total;

    let mut previous_drop = 0.0;
    for ess in [10.0, 50.0, 100.0] {
        let stressed = calculator
            .score(&product, &user(json!({ "schema": ESS_SCHEMA_V1, "ess": ess, "tier": "high" })))
            .total;
        let drop = base - stressed;
        assert!((0.0..=10.0 + 1e-9).contains(&drop), "ess {ess} dropped {drop}");
        assert!(drop >= previous_drop, "penalty must not shrink as ess grows");
        previous_drop = drop;
    }
}

#[test]
fn null_stress_matches_omitted_stress() {
    let calculator = ScoreCalculator::new();
    let product = sku("serum-vc");
    let omitted = user_from_json(&json!({
        "skin_type": "combination",
        "goals": [{ "track": "repair", "priority": 1 }, { "track": "brightening", "priority": 2 }],
        "platform_weights": { "red": 0.5, "reddit": 0.5 }
    }));

    let with_null = calculator.score(&product, &user(Value::Null));
    let without = calculator.score(&product, &omitted);

    assert_eq!(with_null.total, without.total);
    assert_eq!(with_null.stress_penalty, 0.0);
}

#[test]
fn stress_failures_fall_back_to_the_unstressed_score() {
    let calculator = ScoreCalculator::new();
    let product = sku("treatment-cu");
    let base = calculator.score(&product, &user(Value::Null)).total;

    let mut failing = user(Value::Null);
    failing.env_stress =
        resolve_env_stress(|| -> Result<Option<Value>, String> { Err("sensor offline".into()) });
    assert_eq!(calculator.score(&product, &failing).total, base);

    let mut infinite = user(Value::Null);
    infinite.env_stress = Some(EnvStressOutput::v1(f64::INFINITY, StressTier::Severe));
    assert_eq!(calculator.score(&product, &infinite).total, base);

    let legacy = user(json!({ "schema": "legacy.v0", "ess": "very high" }));
    assert_eq!(calculator.score(&product, &legacy).total, base);

    let numeric_string = user(json!({ "schema": ESS_SCHEMA_V1, "ess": "80" }));
    assert_eq!(calculator.score(&product, &numeric_string).total, base);

    let stressed = user(json!({ "schema": ESS_SCHEMA_V1, "ess": 80 }));
    assert!(calculator.score(&product, &stressed).total < base);
}

#[test]
fn identical_mechanism_candidate_ranks_first() {
    let mut items = catalog();
    let mut twin = sku("serum-vc");
    twin.id = SkuId("serum-vc-twin".to_owned());
    twin.price = Decimal::new(900, 2);
    items.push(twin);

    let anchor = sku("serum-vc");
    let dupes = find_dupes(&anchor, &items, 3);

    assert!(!dupes.is_empty());
    assert_eq!(dupes[0].sku.id, SkuId("serum-vc-twin".to_owned()));
    assert!((dupes[0].similarity - 1.0).abs() < 1e-9);
    assert!(dupes.iter().all(|dupe| dupe.sku.price < anchor.price));
}

#[test]
fn copper_peptides_with_vitamin_c_raise_an_advisory() {
    let plan = build_routine(&user(Value::Null), &catalog());

    assert!(plan.conflicts.iter().any(|conflict| conflict == COPPER_PEPTIDE_VITAMIN_C_CONFLICT));
}

#[test]
fn shared_steps_are_priced_once() {
    let plan = build_routine(&user(Value::Null), &catalog());

    assert!(plan.am.iter().any(|step| step.step == Category::Cleanser));
    assert!(plan.pm.iter().any(|step| step.step == Category::Cleanser));
    // cleanser 12.50 + serum 34 + treatment 29 + moisturizer 22
    assert_eq!(plan.estimated_total, Decimal::new(9_750, 2));
}

#[test]
fn facade_rejects_unknown_anchor_and_ranks_known_one() {
    let engine = DeterministicRecommendationEngine::default();
    let items = catalog();

    assert!(engine.find_dupes(&SkuId("nope".to_owned()), &items, None).is_err());

    let dupes = engine.find_dupes(&SkuId("serum-vc".to_owned()), &items, Some(5));
    let ids: Vec<String> = dupes
        .unwrap_or_default()
        .into_iter()
        .map(|dupe| dupe.sku.id.0)
        .collect();
    assert_eq!(ids, vec!["treatment-cu".to_owned()]);
}
