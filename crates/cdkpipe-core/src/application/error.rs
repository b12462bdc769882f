//! Application layer errors.
//!
//! These errors represent failures of the outside world as seen by the
//! pipeline: child processes, the filesystem, and the cloud provider.
//! Validation errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, ScaffoldError};

/// Errors raised while orchestrating the scaffold pipeline.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The credential profile could not be resolved to an account.
    #[error("Unable to resolve account for profile '{profile}': {reason}")]
    Identity { profile: String, reason: String },

    /// A child process failed.
    #[error(transparent)]
    Process(#[from] ProcessFailure),

    /// A filesystem operation on the generated project failed.
    #[error(transparent)]
    Io(#[from] IoFailure),

    /// A call to the repository/identity service failed.
    #[error("{operation} failed: {reason}")]
    RemoteService {
        operation: &'static str,
        reason: String,
    },

    /// The target project directory is already there.
    #[error("Project directory already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The prompter was interrupted or could not read an answer.
    #[error("Input was not collected: {reason}")]
    PromptAborted { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Identity { profile, .. } => vec![
                format!("Check the credentials configured for profile '{profile}'"),
                format!("Try: aws sts get-caller-identity --profile {profile}"),
            ],
            Self::Process(failure) => failure.suggestions(),
            Self::Io(failure) => failure.suggestions(),
            Self::RemoteService { .. } => vec![
                "Check network connectivity and the profile's permissions".into(),
                "A repository with the same name may already exist".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or run cdkpipe from another directory (--workspace)".into(),
            ],
            Self::PromptAborted { .. } => vec!["Nothing was created".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Identity { .. } => ErrorCategory::Identity,
            Self::Process(_) => ErrorCategory::Process,
            Self::Io(_) => ErrorCategory::Io,
            Self::RemoteService { .. } => ErrorCategory::RemoteService,
            Self::ProjectExists { .. } | Self::PromptAborted { .. } => ErrorCategory::Validation,
        }
    }
}

// ── Process failures ─────────────────────────────────────────────────────────

/// A child command did not complete successfully.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessFailure {
    /// The command could not be started at all.
    #[error("Failed to start `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    /// The command ran and exited unsuccessfully.
    #[error("`{command}` exited with {}", exit_status(.code))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The command exceeded the configured bounded wait and was killed.
    #[error("`{command}` timed out after {seconds}s")]
    TimedOut { command: String, seconds: u64 },

    /// A literal command line could not be split into arguments.
    #[error("Malformed command line `{command}`: {reason}")]
    Malformed { command: String, reason: String },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".into(),
    }
}

impl ProcessFailure {
    /// Captured standard error, when the command got far enough to write any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } if !stderr.trim().is_empty() => Some(stderr),
            _ => None,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            Self::Spawn { command, .. }
            | Self::NonZeroExit { command, .. }
            | Self::TimedOut { command, .. }
            | Self::Malformed { command, .. } => command,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Spawn { command, .. } => vec![
                format!(
                    "Ensure `{}` is installed and in your PATH",
                    command.split_whitespace().next().unwrap_or(command)
                ),
            ],
            Self::NonZeroExit { .. } => vec![
                "Check the command output above for details".into(),
                "Re-run with -v to see the full output of every command".into(),
            ],
            Self::TimedOut { .. } => vec![
                "Raise process.timeout_secs in the configuration, or unset it".into(),
            ],
            Self::Malformed { .. } => vec!["This appears to be a bug in cdkpipe".into()],
        }
    }
}

// ── Filesystem failures ──────────────────────────────────────────────────────

/// A filesystem read/write/rename/delete failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IoFailure {
    #[error("Template '{template}' could not be read: {reason}")]
    TemplateUnreadable { template: String, reason: String },

    #[error("Destination directory {} does not exist", .path.display())]
    DestinationMissing { path: PathBuf },

    #[error("Cannot write {}: {reason}", .path.display())]
    DestinationUnwritable { path: PathBuf, reason: String },

    #[error("Cannot read {}: {reason}", .path.display())]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Cannot create directory {}: {reason}", .path.display())]
    CreateDirFailed { path: PathBuf, reason: String },

    #[error("Cannot rename {} to {}: {reason}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("Cannot remove {}: {reason}", .path.display())]
    RemoveFailed { path: PathBuf, reason: String },

    /// A generated file does not have the structure the pipeline needs.
    #[error("Unexpected contents in {}: {reason}", .path.display())]
    MalformedData { path: PathBuf, reason: String },
}

impl IoFailure {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateUnreadable { .. } => vec![
                "Check templates.local_path / CDKPIPE_TEMPLATES_DIR if you override templates"
                    .into(),
            ],
            Self::MalformedData { path, .. } => vec![
                format!("Inspect {} in the generated project", path.display()),
                "The installed CDK CLI may produce a layout cdkpipe does not know".into(),
            ],
            _ => vec![
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],
        }
    }
}

// ── Step failure ─────────────────────────────────────────────────────────────

/// The pipeline stopped because a step failed.
///
/// Carries the label of the failing step and its error, unchanged, plus what
/// the steps before it left behind.
#[derive(Debug, Error, Clone)]
#[error("Step '{step}' failed: {source}")]
pub struct StepFailure {
    pub step: String,
    #[source]
    pub source: ScaffoldError,
    /// Labels of the steps that completed before the failure, in order.
    pub completed: Vec<String>,
    /// Manual cleanup for state the completed steps created.
    pub cleanup: Vec<String>,
}

impl StepFailure {
    pub fn new(step: impl Into<String>, source: ScaffoldError) -> Self {
        Self {
            step: step.into(),
            source,
            completed: Vec::new(),
            cleanup: Vec::new(),
        }
    }

    /// Record the steps that completed before this one.
    pub fn after(mut self, completed: Vec<String>) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_cleanup(mut self, cleanup: Vec<String>) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Whether `label` completed before the failure.
    pub fn completed_step(&self, label: &str) -> bool {
        self.completed.iter().any(|done| done == label)
    }

    /// Suggestions for the underlying error, then the cleanup list.
    pub fn suggestions(&self) -> Vec<String> {
        let mut suggestions = self.source.suggestions();
        if !self.cleanup.is_empty() {
            suggestions.push("The run left the following behind:".into());
            suggestions.extend(self.cleanup.iter().map(|line| format!("  - {line}")));
        }
        suggestions
    }

    /// Captured stderr of the failing command, when there is one.
    pub fn stderr(&self) -> Option<&str> {
        match &self.source {
            ScaffoldError::Application(ApplicationError::Process(failure)) => failure.stderr(),
            _ => None,
        }
    }
}
