use std::path::Path;

use aurora_core::boundary::{sku_from_json, user_from_json};
use aurora_core::config::LoadOptions;
use aurora_core::domain::recommendation::SkuScoreBreakdown;
use aurora_core::engine::{DeterministicRecommendationEngine, RecommendationEngine};
use aurora_core::errors::ApplicationError;

use crate::commands::routine::stress_from_file;
use crate::commands::{load_config, read_json, CommandResult};

const COMMAND: &str = "score";

pub fn run(options: LoadOptions, user: &Path, sku: &Path, stress: Option<&Path>) -> CommandResult {
    match score(options, user, sku, stress) {
        Ok(breakdown) => CommandResult::report(COMMAND, &breakdown),
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn score(
    options: LoadOptions,
    user: &Path,
    sku: &Path,
    stress: Option<&Path>,
) -> Result<SkuScoreBreakdown, ApplicationError> {
    let config = load_config(options)?;
    let engine = DeterministicRecommendationEngine::from_config(&config);

    let mut user = user_from_json(&read_json(user)?);
    if let Some(path) = stress {
        user.env_stress = stress_from_file(path);
    }

    let payload = read_json(sku)?;
    let sku = sku_from_json(&payload).ok_or_else(|| {
        ApplicationError::Input("product payload has no usable id or category".to_string())
    })?;

    Ok(engine.score(&sku, &user))
}
