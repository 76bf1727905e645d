use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use aurora_cli::commands::{config, dupes, routine, score};
use aurora_core::config::LoadOptions;
use serde_json::{json, Value};
use tempfile::TempDir;

#[test]
fn score_prints_breakdown_for_valid_inputs() {
    with_env(&[], || {
        let dir = fixture_dir();
        let result = score::run(
            LoadOptions::default(),
            &dir.path().join("user.json"),
            &write(&dir, "sku.json", &catalog()[1]),
            None,
        );
        assert_eq!(result.exit_code, 0, "expected successful scoring: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["sku_id"], "serum-vc");
        assert_eq!(payload["vetoed"], false);
        let total = payload["total"].as_f64().unwrap_or(-1.0);
        assert!((0.0..=100.0).contains(&total));
    });
}

#[test]
fn score_ignores_unreadable_stress_file() {
    with_env(&[], || {
        let dir = fixture_dir();
        let sku = write(&dir, "sku.json", &catalog()[1]);
        let user = dir.path().join("user.json");

        let base = score::run(LoadOptions::default(), &user, &sku, None);
        let missing_stress = dir.path().join("missing-stress.json");
        let stressed = score::run(LoadOptions::default(), &user, &sku, Some(&missing_stress));

        assert_eq!(stressed.exit_code, 0);
        assert_eq!(parse_payload(&base.output)["total"], parse_payload(&stressed.output)["total"]);
    });
}

#[test]
fn score_reports_input_failure_for_bad_json() {
    with_env(&[], || {
        let dir = fixture_dir();
        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").expect("fixture should be writable");

        let result = score::run(LoadOptions::default(), &broken, &broken, None);
        assert_eq!(result.exit_code, 3, "expected input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "score");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
    });
}

#[test]
fn dupes_are_class_restricted_and_capped() {
    with_env(&[("AURORA_DUPES_MAX_LIMIT", "1"), ("AURORA_DUPES_DEFAULT_LIMIT", "1")], || {
        let dir = fixture_dir();
        let catalog = dir.path().join("catalog.json");
        let result = dupes::run(LoadOptions::default(), &catalog, "serum-vc", Some(10));
        assert_eq!(result.exit_code, 0, "expected dupes success: {}", result.output);

        let payload = parse_payload(&result.output);
        let matches = payload.as_array().cloned().unwrap_or_default();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["sku"]["id"], "treatment-cu");
    });
}

#[test]
fn dupes_report_unknown_anchor() {
    with_env(&[], || {
        let dir = fixture_dir();
        let result =
            dupes::run(LoadOptions::default(), &dir.path().join("catalog.json"), "ghost", None);
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "dupes");
        assert_eq!(payload["error_class"], "unknown_anchor");
    });
}

#[test]
fn routine_prices_shared_steps_once_and_flags_conflicts() {
    with_env(&[], || {
        let dir = fixture_dir();
        let result = routine::run(
            LoadOptions::default(),
            &dir.path().join("user.json"),
            &dir.path().join("catalog.json"),
            None,
        );
        assert_eq!(result.exit_code, 0, "expected routine success: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["estimated_total"].as_f64(), Some(97.5));
        assert_eq!(payload["am"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["pm"].as_array().map(Vec::len), Some(3));
        let conflicts = payload["conflicts"].as_array().cloned().unwrap_or_default();
        assert!(conflicts.iter().any(|conflict| {
            conflict.as_str().unwrap_or_default().starts_with("Copper peptides and vitamin C")
        }));
    });
}

#[test]
fn invalid_config_is_reported_with_config_exit_code() {
    with_env(&[("AURORA_SCORING_SOCIAL_WEIGHT", "0.95")], || {
        let dir = fixture_dir();
        let result = routine::run(
            LoadOptions::default(),
            &dir.path().join("user.json"),
            &dir.path().join("catalog.json"),
            None,
        );
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "routine");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn config_reports_sources_by_precedence() {
    with_env(&[("AURORA_LOG_LEVEL", "debug")], || {
        let dir = fixture_dir();
        let path = dir.path().join("aurora.toml");
        fs::write(&path, "[dupes]\ndefault_limit = 4\n").expect("config should be writable");

        let result = config::run(LoadOptions { config_path: Some(path), ..LoadOptions::default() });
        assert_eq!(result.exit_code, 0, "expected config success: {}", result.output);

        let output = result.output;
        assert!(output.contains("- logging.level = debug (source: env (AURORA_LOG_LEVEL))"));
        assert!(output.contains("- dupes.default_limit = 4 (source: file ("));
        assert!(output.contains("- scoring.social_weight = 0.6 (source: default)"));
    });
}

fn catalog() -> Vec<Value> {
    vec![
        json!({
            "id": "cleanser-gentle", "brand": "Haven", "name": "Low pH Gel Cleanser",
            "category": "cleanser", "price": 12.5,
            "mechanism": { "soothing": 0.6, "repair": 0.3 },
            "social_stats": { "platform_scores": { "red": 0.7, "reddit": 0.8 } }
        }),
        json!({
            "id": "serum-vc", "brand": "Lumen", "name": "Ascorbic Serum 15%",
            "category": "serum", "price": 34,
            "mechanism": { "brightening": 0.9, "redness": 0.2 },
            "actives": ["Vitamin C"],
            "social_stats": { "platform_scores": { "red": 0.9, "reddit": 0.7 } }
        }),
        json!({
            "id": "treatment-cu", "brand": "Buffet Lab", "name": "Copper Peptide Night Treatment",
            "category": "treatment", "price": 29,
            "mechanism": { "repair": 0.8, "brightening": 0.3 },
            "actives": ["Copper Peptides"],
            "social_stats": { "platform_scores": { "red": 0.6, "reddit": 0.9 } }
        }),
        json!({
            "id": "moisturizer-cer", "brand": "Haven", "name": "Ceramide Barrier Cream",
            "category": "moisturizer", "price": 22,
            "mechanism": { "repair": 0.9, "soothing": 0.5 },
            "social_stats": { "platform_scores": { "red": 0.8, "reddit": 0.8 } }
        }),
    ]
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir should be creatable");
    write(&dir, "catalog.json", &Value::Array(catalog()));
    write(
        &dir,
        "user.json",
        &json!({
            "skin_type": "combination",
            "barrier_status": "healthy",
            "goals": [{ "track": "repair", "priority": 1 }, { "track": "brightening", "priority": 2 }]
        }),
    );
    dir
}

fn write(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    let raw = serde_json::to_string_pretty(value).expect("fixture should serialize");
    fs::write(&path, raw).expect("fixture should be writable");
    path
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "AURORA_SCORING_SCIENCE_WEIGHT",
        "AURORA_SCORING_SOCIAL_WEIGHT",
        "AURORA_SCORING_ENGINEERING_WEIGHT",
        "AURORA_SCORING_BURN_RATE_VETO_THRESHOLD",
        "AURORA_DUPES_DEFAULT_LIMIT",
        "AURORA_DUPES_MAX_LIMIT",
        "AURORA_LOGGING_LEVEL",
        "AURORA_LOGGING_FORMAT",
        "AURORA_LOG_LEVEL",
        "AURORA_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
