//! Pipeline runner.
//!
//! A run goes through two phases. Planning resolves every step against the
//! registry and validates every configuration; nothing executes unless the
//! whole plan is clean. Execution then awaits each step in order on one
//! context that lives exactly as long as the run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use taskflow_core::TaskRegistry;
use taskflow_protocols::{
    EventEmitter, ProducerIndex, StepValidationFailure, Task, TaskError, TaskOutput,
    WorkflowContext, WorkflowError, WorkflowEvent,
};

use crate::report::{RunReport, StepReport, StepValidation, ValidationReport};
use crate::workflow::{TaskInvocation, WorkflowDefinition};

/// Lifecycle event names.
pub mod lifecycle {
    pub const WORKFLOW_STARTED: &str = "workflow.started";
    pub const WORKFLOW_COMPLETED: &str = "workflow.completed";
    pub const WORKFLOW_FAILED: &str = "workflow.failed";
    pub const TASK_STARTED: &str = "task.started";
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_FAILED: &str = "task.failed";
}

/// Runner settings.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Upper bound on a single step's `execute`. `None` leaves timeouts to
    /// the tasks themselves.
    pub step_timeout: Option<Duration>,
}

impl PipelineConfig {
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = Some(timeout);
        self
    }
}

/// A step whose task has been resolved and whose config has validated.
pub struct PlannedStep {
    pub invocation: TaskInvocation,
    pub task: Arc<dyn Task>,
    pub warnings: Vec<String>,
}

impl std::fmt::Debug for PlannedStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedStep")
            .field("node_id", &self.invocation.id)
            .field("task_type", &self.invocation.task_type)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Output of [`PipelineRunner::plan`].
#[derive(Debug)]
pub struct ExecutionPlan {
    pub workflow_id: String,
    pub steps: Vec<PlannedStep>,
    /// Context-flow warnings.
    pub warnings: Vec<String>,
}

impl ExecutionPlan {
    /// Every warning of the plan, step warnings prefixed with their node id.
    pub fn all_warnings(&self) -> Vec<String> {
        self.steps
            .iter()
            .flat_map(|s| s.warnings.iter().map(move |w| format!("{}: {}", s.invocation.id, w)))
            .chain(self.warnings.iter().cloned())
            .collect()
    }
}

/// Sequential workflow executor over a shared, read-only registry.
pub struct PipelineRunner {
    registry: Arc<TaskRegistry>,
    producers: Arc<ProducerIndex>,
    config: PipelineConfig,
    emitter: EventEmitter,
}

impl PipelineRunner {
    pub fn new(registry: Arc<TaskRegistry>, config: PipelineConfig) -> Self {
        let producers = Arc::new(registry.producer_index());
        Self {
            registry,
            producers,
            config,
            emitter: EventEmitter::disabled(),
        }
    }

    /// Route task and lifecycle events to `emitter`.
    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve and validate every step without executing anything.
    ///
    /// The first unknown task type is a configuration error. Validation
    /// errors from all steps are reported together.
    pub fn plan(
        &self,
        definition: &WorkflowDefinition,
        initial_data: &HashMap<String, Value>,
    ) -> Result<ExecutionPlan, WorkflowError> {
        definition
            .check()
            .map_err(|e| WorkflowError::InvalidDefinition(e.to_string()))?;

        let resolved = definition
            .steps
            .iter()
            .map(|step| {
                self.registry
                    .resolve(&step.id, &step.task_type)
                    .map(|task| (step, task))
            })
            .collect::<Result<Vec<_>, WorkflowError>>()?;

        let mut failures = Vec::new();
        let mut steps = Vec::with_capacity(resolved.len());
        for (step, task) in resolved {
            let (errors, warnings) = task.validate(&step.config).into_parts();
            for warning in &warnings {
                warn!(node_id = %step.id, task_type = %step.task_type, "Validation warning: {}", warning);
            }
            if !errors.is_empty() {
                failures.push(StepValidationFailure {
                    node_id: step.id.clone(),
                    task_type: step.task_type.clone(),
                    errors,
                });
                continue;
            }
            steps.push(PlannedStep {
                invocation: step.clone(),
                task,
                warnings,
            });
        }

        if !failures.is_empty() {
            return Err(WorkflowError::Validation(failures));
        }

        let warnings = context_flow_warnings(
            steps.iter().map(|s| (&s.invocation, s.task.as_ref())),
            initial_data.keys().cloned(),
        );
        for warning in &warnings {
            warn!(workflow_id = %definition.id, "{}", warning);
        }

        Ok(ExecutionPlan {
            workflow_id: definition.id.clone(),
            steps,
            warnings,
        })
    }

    /// Check a workflow and report every problem found, without failing fast.
    pub fn validate_workflow(&self, definition: &WorkflowDefinition) -> ValidationReport {
        let mut report = ValidationReport {
            workflow_id: definition.id.clone(),
            ..Default::default()
        };
        if let Err(e) = definition.check() {
            report.errors.push(e.to_string());
        }

        let mut known = Vec::new();
        for step in &definition.steps {
            match self.registry.get(&step.task_type) {
                Some(task) => {
                    let (errors, warnings) = task.validate(&step.config).into_parts();
                    report.steps.push(StepValidation {
                        node_id: step.id.clone(),
                        task_type: step.task_type.clone(),
                        errors,
                        warnings,
                    });
                    known.push((step, task));
                }
                None => report.steps.push(StepValidation {
                    node_id: step.id.clone(),
                    task_type: step.task_type.clone(),
                    errors: vec![format!(
                        "Task type '{}' is not available in this deployment",
                        step.task_type
                    )],
                    warnings: Vec::new(),
                }),
            }
        }

        report.warnings = context_flow_warnings(
            known.iter().map(|(step, task)| (*step, task.as_ref())),
            std::iter::empty(),
        );
        report
    }

    /// Run a workflow to completion.
    pub async fn run(
        &self,
        definition: &WorkflowDefinition,
        initial_data: HashMap<String, Value>,
    ) -> Result<RunReport, WorkflowError> {
        self.run_with_cancel(definition, initial_data, CancellationToken::new())
            .await
    }

    /// Run a workflow, stopping early when `cancel` fires.
    ///
    /// The first failing step aborts the run. Side effects of steps that
    /// already completed are left in place.
    pub async fn run_with_cancel(
        &self,
        definition: &WorkflowDefinition,
        initial_data: HashMap<String, Value>,
        cancel: CancellationToken,
    ) -> Result<RunReport, WorkflowError> {
        let plan = self.plan(definition, &initial_data).inspect_err(|e| {
            error!(workflow_id = %definition.id, kind = e.kind(), "Workflow rejected: {}", e);
        })?;

        let run_id = Uuid::new_v4().to_string();
        let dropped_before = self.emitter.dropped_count();
        let started = Instant::now();

        let mut ctx = WorkflowContext::new(run_id.clone())
            .with_emitter(self.emitter.clone())
            .with_producers(self.producers.clone())
            .with_cancellation(cancel.clone())
            .with_data(initial_data);

        info!(
            run_id = %run_id,
            workflow_id = %plan.workflow_id,
            steps = plan.steps.len(),
            "Workflow started"
        );
        self.lifecycle(
            &run_id,
            None,
            lifecycle::WORKFLOW_STARTED,
            json!({ "workflowId": plan.workflow_id, "steps": plan.steps.len() }),
        );

        let mut steps = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let outcome = if cancel.is_cancelled() {
                Err(WorkflowError::Cancelled {
                    node_id: step.invocation.id.clone(),
                })
            } else {
                let span = info_span!(
                    "task",
                    node_id = %step.invocation.id,
                    task_type = %step.invocation.task_type
                );
                self.execute_step(step, &mut ctx).instrument(span).await
            };

            match outcome {
                Ok(report) => steps.push(report),
                Err(err) => {
                    error!(run_id = %run_id, kind = err.kind(), "Workflow failed: {}", err);
                    self.lifecycle(
                        &run_id,
                        err.node_id().map(str::to_string),
                        lifecycle::WORKFLOW_FAILED,
                        json!({
                            "workflowId": plan.workflow_id,
                            "kind": err.kind(),
                            "error": err.to_string(),
                            "completedSteps": steps.len(),
                        }),
                    );
                    return Err(err);
                }
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(run_id = %run_id, duration_ms, "Workflow completed");
        self.lifecycle(
            &run_id,
            None,
            lifecycle::WORKFLOW_COMPLETED,
            json!({ "workflowId": plan.workflow_id, "durationMs": duration_ms }),
        );

        let warnings = plan.all_warnings();
        Ok(RunReport {
            run_id,
            workflow_id: plan.workflow_id,
            steps,
            data: ctx.into_data().into_iter().collect::<BTreeMap<_, _>>(),
            warnings,
            dropped_events: self.emitter.dropped_count().saturating_sub(dropped_before),
            duration_ms,
        })
    }

    async fn execute_step(
        &self,
        step: &PlannedStep,
        ctx: &mut WorkflowContext,
    ) -> Result<StepReport, WorkflowError> {
        let node_id = step.invocation.id.clone();
        let task_type = step.invocation.task_type.clone();
        let run_id = ctx.run_id().to_string();

        ctx.set_node_id(node_id.clone());
        self.lifecycle(
            &run_id,
            Some(node_id.clone()),
            lifecycle::TASK_STARTED,
            json!({ "taskType": task_type }),
        );
        debug!("Executing task");

        let started = Instant::now();
        let cancel = ctx.cancellation().clone();
        let limit = self.config.step_timeout;
        let execution = async {
            let fut = step.task.execute(step.invocation.config.clone(), ctx);
            match limit {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .unwrap_or_else(|_| Err(TaskError::Timeout(limit))),
                None => fut.await,
            }
        };
        let outcome: Result<TaskOutput, TaskError> = tokio::select! {
            result = execution => result,
            _ = cancel.cancelled() => Err(TaskError::Cancelled),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => {
                debug!(duration_ms, "Task completed");
                self.lifecycle(
                    &run_id,
                    Some(node_id.clone()),
                    lifecycle::TASK_COMPLETED,
                    json!({ "taskType": task_type, "durationMs": duration_ms }),
                );
                Ok(StepReport {
                    node_id,
                    task_type,
                    output: output.data,
                    message: output.message,
                    duration_ms,
                })
            }
            Err(TaskError::Cancelled) => {
                info!(duration_ms, "Task cancelled");
                self.lifecycle(
                    &run_id,
                    Some(node_id.clone()),
                    lifecycle::TASK_FAILED,
                    json!({ "taskType": task_type, "error": "cancelled" }),
                );
                Err(WorkflowError::Cancelled { node_id })
            }
            Err(source) => {
                error!(duration_ms, "Task failed: {}", source);
                self.lifecycle(
                    &run_id,
                    Some(node_id.clone()),
                    lifecycle::TASK_FAILED,
                    json!({ "taskType": task_type, "error": source.to_string() }),
                );
                Err(WorkflowError::Execution {
                    node_id: ctx.node_id().to_string(),
                    task_type,
                    input: step.invocation.config.clone(),
                    source,
                })
            }
        }
    }

    fn lifecycle(&self, run_id: &str, node_id: Option<String>, name: &str, payload: Value) {
        self.emitter
            .emit(WorkflowEvent::new(name, payload, run_id, node_id));
    }
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("emitter", &self.emitter)
            .finish()
    }
}

/// Warn about steps that read a context key no earlier step writes.
fn context_flow_warnings<'a, I, K>(steps: I, initial_keys: K) -> Vec<String>
where
    I: IntoIterator<Item = (&'a TaskInvocation, &'a dyn Task)>,
    K: IntoIterator<Item = String>,
{
    let mut available: HashSet<String> = initial_keys.into_iter().collect();
    let mut warnings = Vec::new();
    for (step, task) in steps {
        for key in task.context_reads(&step.config) {
            if !available.contains(&key) {
                warnings.push(format!(
                    "Step '{}' ({}) reads context key '{}' that no earlier step writes",
                    step.id, step.task_type, key
                ));
            }
        }
        available.extend(task.context_writes(&step.config));
    }
    warnings
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
