use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use aurora_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            )
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields: [(&str, String, &[&str]); 8] = [
        (
            "scoring.science_weight",
            config.scoring.science_weight.to_string(),
            &["AURORA_SCORING_SCIENCE_WEIGHT"],
        ),
        (
            "scoring.social_weight",
            config.scoring.social_weight.to_string(),
            &["AURORA_SCORING_SOCIAL_WEIGHT"],
        ),
        (
            "scoring.engineering_weight",
            config.scoring.engineering_weight.to_string(),
            &["AURORA_SCORING_ENGINEERING_WEIGHT"],
        ),
        (
            "scoring.burn_rate_veto_threshold",
            config.scoring.burn_rate_veto_threshold.to_string(),
            &["AURORA_SCORING_BURN_RATE_VETO_THRESHOLD"],
        ),
        (
            "dupes.default_limit",
            config.dupes.default_limit.to_string(),
            &["AURORA_DUPES_DEFAULT_LIMIT"],
        ),
        ("dupes.max_limit", config.dupes.max_limit.to_string(), &["AURORA_DUPES_MAX_LIMIT"]),
        (
            "logging.level",
            config.logging.level.clone(),
            &["AURORA_LOGGING_LEVEL", "AURORA_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["AURORA_LOGGING_FORMAT", "AURORA_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value, env_keys) in fields {
        let source =
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key_path, &value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn detect_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then_some(path.to_path_buf());
    }

    let root = PathBuf::from("aurora.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/aurora.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        let is_set = env::var(env_key).map(|value| !value.trim().is_empty()).unwrap_or(false);
        if is_set {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
