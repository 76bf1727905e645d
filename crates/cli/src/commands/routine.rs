use std::path::Path;

use aurora_core::boundary::{catalog_from_json, resolve_env_stress, user_from_json};
use aurora_core::config::LoadOptions;
use aurora_core::domain::consultation::EnvStressOutput;
use aurora_core::domain::recommendation::RoutinePlan;
use aurora_core::engine::{DeterministicRecommendationEngine, RecommendationEngine};
use aurora_core::errors::ApplicationError;

use crate::commands::{load_config, read_json, CommandResult};

const COMMAND: &str = "routine";

pub fn run(
    options: LoadOptions,
    user: &Path,
    catalog: &Path,
    stress: Option<&Path>,
) -> CommandResult {
    match routine(options, user, catalog, stress) {
        Ok(plan) => CommandResult::report(COMMAND, &plan),
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn routine(
    options: LoadOptions,
    user: &Path,
    catalog: &Path,
    stress: Option<&Path>,
) -> Result<RoutinePlan, ApplicationError> {
    let config = load_config(options)?;
    let engine = DeterministicRecommendationEngine::from_config(&config);

    let mut user = user_from_json(&read_json(user)?);
    if let Some(path) = stress {
        user.env_stress = stress_from_file(path);
    }
    let catalog = catalog_from_json(&read_json(catalog)?);

    Ok(engine.build_routine(&user, &catalog))
}

/// An unreadable stress file scores as if no stress data was supplied.
pub(crate) fn stress_from_file(path: &Path) -> Option<EnvStressOutput> {
    resolve_env_stress(|| read_json(path).map(Some))
}
