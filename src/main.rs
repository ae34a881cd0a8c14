//! taskflow - workflow task execution framework
//!
//! Command-line entry point: list tasks, validate and run workflows.

mod cli;
mod cmd_tasks;
mod cmd_workflow;
mod register;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use taskflow_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    // Logs go to stderr so stdout stays clean for reports.
    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .boxed();

    let file = if logging.file {
        let log_dir = logging.dir_path();
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("taskflow")
            .filename_suffix("log")
            .max_log_files(14)
            .build(&log_dir)
            .context("Failed to create log file appender")?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keeps the background writer alive until exit.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false).boxed())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

/// Log config warnings; refuse to start on config errors.
fn check_config(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config: {}", warning);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result.errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("Invalid configuration: {}", errors.join("; "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    let outcome = async {
        check_config(&config)?;
        match cli.command {
            Commands::Tasks { format } => cmd_tasks::list_tasks(&config, format),
            Commands::Validate { workflow } => cmd_workflow::validate(&config, &workflow),
            Commands::Run { workflow, data } => {
                cmd_workflow::run(&config, &workflow, data.as_deref()).await
            }
        }
    }
    .await;

    match outcome {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
