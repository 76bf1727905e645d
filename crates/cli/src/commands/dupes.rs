use std::path::Path;

use aurora_core::boundary::catalog_from_json;
use aurora_core::config::LoadOptions;
use aurora_core::domain::product::SkuId;
use aurora_core::domain::recommendation::DupeMatch;
use aurora_core::engine::{DeterministicRecommendationEngine, RecommendationEngine};
use aurora_core::errors::ApplicationError;

use crate::commands::{load_config, read_json, CommandResult};

const COMMAND: &str = "dupes";

pub fn run(
    options: LoadOptions,
    catalog: &Path,
    anchor: &str,
    limit: Option<usize>,
) -> CommandResult {
    match dupes(options, catalog, anchor, limit) {
        Ok(matches) => CommandResult::report(COMMAND, &matches),
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn dupes(
    options: LoadOptions,
    catalog: &Path,
    anchor: &str,
    limit: Option<usize>,
) -> Result<Vec<DupeMatch>, ApplicationError> {
    let config = load_config(options)?;
    let engine = DeterministicRecommendationEngine::from_config(&config);

    let catalog = catalog_from_json(&read_json(catalog)?);
    let anchor = SkuId(anchor.trim().to_string());
    let limit = config.dupes.cap_limit(limit);

    Ok(engine.find_dupes(&anchor, &catalog, Some(limit))?)
}
