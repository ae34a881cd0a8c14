//! `taskflow validate` and `taskflow run`.

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;
use tracing::info;

use taskflow_config::Config;
use taskflow_protocols::EventEmitter;
use taskflow_runtime::{
    build_registry, EventPump, LogEventSink, PipelineConfig, PipelineRunner, WorkflowDefinition,
};

use crate::register::build_integrations;

fn runner(config: &Config) -> anyhow::Result<PipelineRunner> {
    let integrations = build_integrations(config)?;
    let registry = Arc::new(build_registry(&integrations));
    let pipeline = PipelineConfig {
        step_timeout: config.runner.step_timeout(),
    };
    Ok(PipelineRunner::new(registry, pipeline))
}

fn load_workflow(path: &Path) -> anyhow::Result<WorkflowDefinition> {
    WorkflowDefinition::load(path)
        .with_context(|| format!("Failed to load workflow {}", path.display()))
}

/// Parse `--data` into initial context data.
pub(crate) fn parse_initial_data(data: Option<&str>) -> anyhow::Result<HashMap<String, Value>> {
    let Some(data) = data else {
        return Ok(HashMap::new());
    };
    match serde_json::from_str::<Value>(data).context("--data is not valid JSON")? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => bail!("--data must be a JSON object"),
    }
}

/// Print a static validation report. Fails when any error is found.
pub(crate) fn validate(config: &Config, path: &Path) -> anyhow::Result<ExitCode> {
    let definition = load_workflow(path)?;
    let report = runner(config)?.validate_workflow(&definition);

    for error in &report.errors {
        println!("error: {}", error);
    }
    for step in &report.steps {
        let status = if step.is_valid() { "ok" } else { "invalid" };
        println!("[{}] {} ({})", status, step.node_id, step.task_type);
        for error in &step.errors {
            println!("    error: {}", error);
        }
        for warning in &step.warnings {
            println!("    warning: {}", warning);
        }
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    println!(
        "{}: {} error(s), {} warning(s)",
        definition.id,
        report.error_count(),
        report.warning_count()
    );

    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Run a workflow and print its report as JSON.
pub(crate) async fn run(config: &Config, path: &Path, data: Option<&str>) -> anyhow::Result<ExitCode> {
    let definition = load_workflow(path)?;
    let initial = parse_initial_data(data)?;

    let (emitter, events) = EventEmitter::channel(config.runner.event_buffer);
    let pump = EventPump::spawn(events, Arc::new(LogEventSink));
    let runner = runner(config)?.with_emitter(emitter);

    let result = runner.run(&definition, initial).await;
    drop(runner);
    let delivered = pump.finish().await;
    info!(delivered, "Event pump drained");

    let report = result?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}
