pub mod config;
pub mod dupes;
pub mod routine;
pub mod score;

use std::fs;
use std::path::Path;

use anyhow::Context;
use aurora_core::config::{AppConfig, LoadOptions};
use aurora_core::errors::ApplicationError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        let message = format!("{} ({error})", error.user_message());
        Self::failure(command, error.error_class(), message, error.exit_code())
    }

    /// Engine output printed as pretty JSON on stdout.
    pub fn report<T: Serialize>(command: &str, report: &T) -> Self {
        match serde_json::to_string_pretty(report) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }
}

pub(crate) fn load_config(options: LoadOptions) -> Result<AppConfig, ApplicationError> {
    AppConfig::load(options).map_err(|error| ApplicationError::Configuration(error.to_string()))
}

pub(crate) fn read_json(path: &Path) -> Result<Value, ApplicationError> {
    read_json_file(path).map_err(|error| ApplicationError::Input(format!("{error:#}")))
}

fn read_json_file(path: &Path) -> anyhow::Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("`{}` is not valid JSON", path.display()))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
