pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use aurora_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "aurora",
    about = "Aurora skincare decision engine CLI",
    long_about = "Score products for a consultation, find cheaper dupes, assemble AM/PM routines, and inspect configuration.",
    after_help = "Examples:\n  aurora score --user user.json --sku sku.json\n  aurora dupes --catalog catalog.json --anchor sku-123\n  aurora routine --user user.json --catalog catalog.json\n  aurora config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to an aurora.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override logging.level for this run")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Score one product for one consultation and print the breakdown")]
    Score {
        #[arg(long, help = "Consultation JSON file")]
        user: PathBuf,
        #[arg(long, help = "Product JSON file")]
        sku: PathBuf,
        #[arg(long, help = "Environmental stress JSON file (ignored when unreadable)")]
        stress: Option<PathBuf>,
    },
    #[command(about = "Rank strictly cheaper look-alikes of a catalog product")]
    Dupes {
        #[arg(long, help = "Catalog JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "Id of the anchor product")]
        anchor: String,
        #[arg(long, help = "Maximum number of matches (capped by dupes.max_limit)")]
        limit: Option<usize>,
    },
    #[command(about = "Assemble an AM/PM routine from a catalog")]
    Routine {
        #[arg(long, help = "Consultation JSON file")]
        user: PathBuf,
        #[arg(long, help = "Catalog JSON file")]
        catalog: PathBuf,
        #[arg(long, help = "Environmental stress JSON file (ignored when unreadable)")]
        stress: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        config_path: cli.config.clone(),
        require_file: cli.config.is_some(),
        overrides: ConfigOverrides { log_level: cli.log_level.clone(), ..ConfigOverrides::default() },
    };

    match AppConfig::load(options.clone()) {
        Ok(config) => init_logging(&config),
        Err(_) => init_logging(&AppConfig::default()),
    }

    let result = match cli.command {
        Command::Score { user, sku, stress } => {
            commands::score::run(options, &user, &sku, stress.as_deref())
        }
        Command::Dupes { catalog, anchor, limit } => {
            commands::dupes::run(options, &catalog, &anchor, limit)
        }
        Command::Routine { user, catalog, stress } => {
            commands::routine::run(options, &user, &catalog, stress.as_deref())
        }
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr; stdout carries command output only. Installs the
/// global subscriber, so it runs once per process.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
