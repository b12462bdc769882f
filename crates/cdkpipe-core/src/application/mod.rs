//! Application layer for cdkpipe.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, StepOrchestrator,
//!   ProcessRunner, TemplateRenderer)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Validation lives in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    Completion, ProcessRunner, RunSummary, ScaffoldReport, ScaffoldService, Step,
    StepOrchestrator, TemplateJob, TemplateRenderer,
};

pub use ports::{
    CloudProvider, CommandInvocation, Filesystem, ProcessHost, ProgressReporter, Prompter,
    TemplateLibrary,
};

pub use error::{ApplicationError, IoFailure, ProcessFailure, StepFailure};
