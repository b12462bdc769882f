//! Unified error handling for cdkpipe core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::{ApplicationError, IoFailure, ProcessFailure};
use crate::domain::DomainError;

/// Root error type for cdkpipe core operations.
#[derive(Debug, Error, Clone)]
pub enum ScaffoldError {
    /// Errors from the domain layer (validation, invariants).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (processes, files, remote calls).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or wiring errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ScaffoldError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Identity => ErrorCategory::Identity,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

impl From<ProcessFailure> for ScaffoldError {
    fn from(failure: ProcessFailure) -> Self {
        Self::Application(ApplicationError::Process(failure))
    }
}

impl From<IoFailure> for ScaffoldError {
    fn from(failure: IoFailure) -> Self {
        Self::Application(ApplicationError::Io(failure))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed user input.
    Validation,
    /// Credentials or profile could not be resolved.
    Identity,
    /// A child process failed.
    Process,
    /// A filesystem operation failed.
    Io,
    /// A remote API call failed.
    RemoteService,
    /// Misconfiguration or a violated internal invariant.
    Configuration,
}

/// Convenient result type alias.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

