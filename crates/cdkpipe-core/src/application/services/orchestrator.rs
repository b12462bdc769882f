//! Ordered, fail-fast execution of labelled steps over a shared context.

use tracing::{info, instrument, warn};

use crate::{
    application::{error::StepFailure, ports::ProgressReporter, services::progress},
    domain::PipelineContext,
    error::ScaffoldResult,
};

/// Predicate deciding whether a step applies to a run.
pub type Guard = fn(&PipelineContext) -> bool;

type Action<'a> = Box<dyn Fn(&mut PipelineContext) -> ScaffoldResult<()> + 'a>;

/// One named unit of the pipeline.
pub struct Step<'a> {
    label: String,
    guard: Option<Guard>,
    action: Action<'a>,
}

impl<'a> Step<'a> {
    /// A step that always runs.
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut PipelineContext) -> ScaffoldResult<()> + 'a,
    {
        Self {
            label: label.into(),
            guard: None,
            action: Box::new(action),
        }
    }

    /// Only run the step when `guard` holds for the context.
    pub fn when(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn applies_to(&self, ctx: &PipelineContext) -> bool {
        self.guard.is_none_or(|guard| guard(ctx))
    }
}

impl std::fmt::Debug for Step<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label)
            .field("guarded", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

/// Labels of the steps a run completed and skipped, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Runs steps in declaration order, each wrapped by the progress reporter.
pub struct StepOrchestrator<'a> {
    reporter: &'a dyn ProgressReporter,
}

impl<'a> StepOrchestrator<'a> {
    pub fn new(reporter: &'a dyn ProgressReporter) -> Self {
        Self { reporter }
    }

    /// Execute `steps` against `ctx`.
    ///
    /// Stops at the first failing step and returns its label with the
    /// untouched error. Steps already applied are not undone and later steps
    /// are never invoked.
    #[instrument(skip_all, fields(steps = steps.len()))]
    pub fn run(
        &self,
        steps: &[Step<'_>],
        ctx: &mut PipelineContext,
    ) -> Result<RunSummary, StepFailure> {
        let mut summary = RunSummary::default();

        for step in steps {
            if !step.applies_to(ctx) {
                info!(step = %step.label, "skipped");
                summary.skipped.push(step.label.clone());
                continue;
            }

            progress::wrap(self.reporter, &step.label, || (step.action)(ctx)).map_err(|e| {
                warn!(step = %step.label, error = %e, "step failed, aborting run");
                StepFailure::new(step.label.clone(), e).after(summary.completed.clone())
            })?;

            summary.completed.push(step.label.clone());
        }

        Ok(summary)
    }
}
