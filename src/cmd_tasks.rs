//! `taskflow tasks`.

use std::process::ExitCode;

use taskflow_config::Config;
use taskflow_runtime::build_registry;

use crate::cli::OutputFormat;
use crate::register::build_integrations;

/// Print the task types available with the configured integrations.
pub(crate) fn list_tasks(config: &Config, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let integrations = build_integrations(config)?;
    let definitions = build_registry(&integrations).definitions();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }
        OutputFormat::Table => {
            println!("{:<24} {:<10} {:<24} {}", "TYPE", "CATEGORY", "LABEL", "REQUIRED");
            println!("{}", "-".repeat(80));
            for definition in &definitions {
                let category = serde_json::to_value(definition.display.category)?;
                println!(
                    "{:<24} {:<10} {:<24} {}",
                    definition.task_type,
                    category.as_str().unwrap_or("-"),
                    definition.display.label,
                    definition.schema.required.join(", ")
                );
            }
            println!();
            println!(
                "{} task type(s); integrations: {}",
                definitions.len(),
                integrations
                    .available()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
