//! Scripted process host for testing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cdkpipe_core::application::{
    ProcessFailure,
    ports::{CommandInvocation, ProcessHost, ProcessStatus},
};

type Effect = Box<dyn Fn(&CommandInvocation) + Send + Sync>;

enum Outcome {
    Status(ProcessStatus),
    Failure(ProcessFailure),
}

struct Rule {
    prefix: String,
    outcome: Outcome,
    effect: Option<Effect>,
}

/// A [`ProcessHost`] that never starts a process.
///
/// Every invocation is recorded. The first rule whose prefix matches the
/// displayed command decides the outcome and may run a side effect, e.g.
/// seeding the files `cdk init` would have generated. Unmatched commands
/// succeed with empty output.
///
/// Clones share the rules and the log.
#[derive(Clone, Default)]
pub struct ScriptedProcessHost {
    rules: Arc<Mutex<Vec<Rule>>>,
    log: Arc<Mutex<Vec<CommandInvocation>>>,
}

impl ScriptedProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands starting with `prefix` with `status`.
    pub fn respond(self, prefix: impl Into<String>, status: ProcessStatus) -> Self {
        self.push(prefix.into(), Outcome::Status(status), None)
    }

    /// Fail commands starting with `prefix` with `failure`.
    pub fn fail(self, prefix: impl Into<String>, failure: ProcessFailure) -> Self {
        self.push(prefix.into(), Outcome::Failure(failure), None)
    }

    /// Succeed commands starting with `prefix` after running `effect`.
    pub fn on_run<F>(self, prefix: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&CommandInvocation) + Send + Sync + 'static,
    {
        self.push(
            prefix.into(),
            Outcome::Status(ProcessStatus::ok("")),
            Some(Box::new(effect)),
        )
    }

    /// Every invocation received so far, in order.
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        lock(&self.log).clone()
    }

    /// Displayed form of every invocation received so far.
    pub fn commands(&self) -> Vec<String> {
        lock(&self.log).iter().map(CommandInvocation::display).collect()
    }

    fn push(self, prefix: String, outcome: Outcome, effect: Option<Effect>) -> Self {
        lock(&self.rules).push(Rule {
            prefix,
            outcome,
            effect,
        });
        self
    }
}

impl ProcessHost for ScriptedProcessHost {
    fn run(&self, invocation: &CommandInvocation) -> Result<ProcessStatus, ProcessFailure> {
        lock(&self.log).push(invocation.clone());

        let display = invocation.display();
        let rules = lock(&self.rules);
        let Some(rule) = rules.iter().find(|r| display.starts_with(&r.prefix)) else {
            return Ok(ProcessStatus::ok(""));
        };

        if let Some(effect) = &rule.effect {
            effect(invocation);
        }
        match &rule.outcome {
            Outcome::Status(status) => Ok(status.clone()),
            Outcome::Failure(failure) => Err(failure.clone()),
        }
    }
}

impl std::fmt::Debug for ScriptedProcessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProcessHost")
            .field("rules", &lock(&self.rules).len())
            .field("invocations", &lock(&self.log).len())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
