//! CLI definitions for taskflow.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// taskflow CLI.
#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Validate and run task pipelines")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.taskflow/config.toml)
    #[arg(short, long, global = true, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the task types available with the configured integrations
    Tasks {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check a workflow file without running it
    Validate {
        /// Workflow file (.json, .yaml or .yml)
        workflow: PathBuf,
    },

    /// Run a workflow and print the run report
    Run {
        /// Workflow file (.json, .yaml or .yml)
        workflow: PathBuf,

        /// Initial context data as a JSON object
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
