use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dupes::{DupeMatcher, DEFAULT_DUPE_LIMIT};
use crate::scoring::{
    ScoreCalculator, ScoringWeights, DEFAULT_BURN_RATE_VETO_THRESHOLD, DEFAULT_WEIGHTS,
};

pub const DEFAULT_MAX_DUPE_LIMIT: usize = 20;
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub dupes: DupeConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoringConfig {
    pub science_weight: f64,
    pub social_weight: f64,
    pub engineering_weight: f64,
    pub burn_rate_veto_threshold: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DupeConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub dupe_default_limit: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                science_weight: DEFAULT_WEIGHTS.science,
                social_weight: DEFAULT_WEIGHTS.social,
                engineering_weight: DEFAULT_WEIGHTS.engineering,
                burn_rate_veto_threshold: DEFAULT_BURN_RATE_VETO_THRESHOLD,
            },
            dupes: DupeConfig { default_limit: DEFAULT_DUPE_LIMIT, max_limit: DEFAULT_MAX_DUPE_LIMIT },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            science: self.science_weight,
            social: self.social_weight,
            engineering: self.engineering_weight,
        }
    }

    pub fn calculator(&self) -> ScoreCalculator {
        ScoreCalculator::with_weights(self.weights())
            .with_burn_rate_veto_threshold(self.burn_rate_veto_threshold)
    }
}

impl DupeConfig {
    pub fn matcher(&self) -> DupeMatcher {
        DupeMatcher::with_default_limit(self.default_limit)
    }

    /// Caller-side cap on a requested dupe count; zero means the default.
    pub fn cap_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(limit) if limit > 0 => limit.min(self.max_limit),
            _ => self.default_limit,
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("aurora.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(scoring) = patch.scoring {
            if let Some(science_weight) = scoring.science_weight {
                self.scoring.science_weight = science_weight;
            }
            if let Some(social_weight) = scoring.social_weight {
                self.scoring.social_weight = social_weight;
            }
            if let Some(engineering_weight) = scoring.engineering_weight {
                self.scoring.engineering_weight = engineering_weight;
            }
            if let Some(threshold) = scoring.burn_rate_veto_threshold {
                self.scoring.burn_rate_veto_threshold = threshold;
            }
        }

        if let Some(dupes) = patch.dupes {
            if let Some(default_limit) = dupes.default_limit {
                self.dupes.default_limit = default_limit;
            }
            if let Some(max_limit) = dupes.max_limit {
                self.dupes.max_limit = max_limit;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("AURORA_SCORING_SCIENCE_WEIGHT") {
            self.scoring.science_weight = parse_f64("AURORA_SCORING_SCIENCE_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("AURORA_SCORING_SOCIAL_WEIGHT") {
            self.scoring.social_weight = parse_f64("AURORA_SCORING_SOCIAL_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("AURORA_SCORING_ENGINEERING_WEIGHT") {
            self.scoring.engineering_weight =
                parse_f64("AURORA_SCORING_ENGINEERING_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("AURORA_SCORING_BURN_RATE_VETO_THRESHOLD") {
            self.scoring.burn_rate_veto_threshold =
                parse_f64("AURORA_SCORING_BURN_RATE_VETO_THRESHOLD", &value)?;
        }

        if let Some(value) = read_env("AURORA_DUPES_DEFAULT_LIMIT") {
            self.dupes.default_limit = parse_usize("AURORA_DUPES_DEFAULT_LIMIT", &value)?;
        }
        if let Some(value) = read_env("AURORA_DUPES_MAX_LIMIT") {
            self.dupes.max_limit = parse_usize("AURORA_DUPES_MAX_LIMIT", &value)?;
        }

        let log_level = read_env("AURORA_LOGGING_LEVEL").or_else(|| read_env("AURORA_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("AURORA_LOGGING_FORMAT").or_else(|| read_env("AURORA_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(default_limit) = overrides.dupe_default_limit {
            self.dupes.default_limit = default_limit;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_scoring(&self.scoring)?;
        validate_dupes(&self.dupes)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("aurora.toml"), PathBuf::from("config/aurora.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<(), ConfigError> {
    let weights = [
        ("scoring.science_weight", scoring.science_weight),
        ("scoring.social_weight", scoring.social_weight),
        ("scoring.engineering_weight", scoring.engineering_weight),
    ];
    for (key, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{key} must be a finite, non-negative number"
            )));
        }
    }

    let sum: f64 = weights.iter().map(|(_, weight)| weight).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::Validation(format!(
            "scoring weights must sum to 1.0 (got {sum:.4})"
        )));
    }

    let threshold = scoring.burn_rate_veto_threshold;
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::Validation(
            "scoring.burn_rate_veto_threshold must be in range 0..=1".to_string(),
        ));
    }

    Ok(())
}

fn validate_dupes(dupes: &DupeConfig) -> Result<(), ConfigError> {
    if dupes.default_limit == 0 {
        return Err(ConfigError::Validation(
            "dupes.default_limit must be greater than zero".to_string(),
        ));
    }

    if dupes.max_limit > 100 {
        return Err(ConfigError::Validation("dupes.max_limit must be at most 100".to_string()));
    }

    if dupes.default_limit > dupes.max_limit {
        return Err(ConfigError::Validation(
            "dupes.default_limit must not exceed dupes.max_limit".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    scoring: Option<ScoringPatch>,
    dupes: Option<DupePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    science_weight: Option<f64>,
    social_weight: Option<f64>,
    engineering_weight: Option<f64>,
    burn_rate_veto_threshold: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct DupePatch {
    default_limit: Option<usize>,
    max_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
