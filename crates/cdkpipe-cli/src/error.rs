//! Error handling for the cdkpipe CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping
//!
//! A failed pipeline step is reported with its label and, when the failing
//! command wrote any, its captured stderr.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use cdkpipe_core::application::{ApplicationError, ProcessFailure, StepFailure};
use cdkpipe_core::error::{ErrorCategory as CoreCategory, ScaffoldError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// A pipeline step failed; nothing after it ran.
    #[error(transparent)]
    Step(#[from] StepFailure),

    /// An error raised before the pipeline started (prompts, identity,
    /// pre-flight checks).
    #[error(transparent)]
    Core(#[from] ScaffoldError),

    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// Writing to the terminal failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Feature not available (interactive prompts without the feature flag).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::ConfigError {
            message: format!("{err:#}"),
            source: Some(err.into()),
        }
    }
}

impl CliError {
    /// The core error behind this one, if any.
    fn core(&self) -> Option<&ScaffoldError> {
        match self {
            Self::Step(failure) => Some(&failure.source),
            Self::Core(err) => Some(err),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Step(failure) => failure.suggestions(),
            Self::Core(core_err) => core_err.suggestions(),
            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Check CDKPIPE_* environment variables".into(),
            ],
            Self::IoError { message, .. } => {
                vec![format!("I/O operation failed: {}", message)]
            }
            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{}' feature is not available in this build", feature),
                format!(
                    "Install with the feature enabled: cargo install cdkpipe-cli --features {}",
                    feature
                ),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        if let Some(core) = self.core() {
            return category_of(core);
        }
        match self {
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            _ => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    fn stderr(&self) -> Option<&str> {
        match self {
            Self::Step(failure) => failure.stderr(),
            _ => None,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if let Some(stderr) = self.stderr() {
            output.push_str(&format!("\n{}\n", "Command output:".bold()));
            for line in stderr.trim_end().lines() {
                output.push_str(&format!("  {}\n", line.dimmed()));
            }
        }

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if let Some(stderr) = self.stderr() {
            out.push_str("\nCommand output:\n");
            for line in stderr.trim_end().lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// A tool that could not be started is "not found"; other process and
/// remote failures are external failures.
fn category_of(err: &ScaffoldError) -> ErrorCategory {
    if let ScaffoldError::Application(ApplicationError::Process(ProcessFailure::Spawn { .. })) =
        err
    {
        return ErrorCategory::NotFound;
    }
    match err.category() {
        CoreCategory::Validation | CoreCategory::Identity => ErrorCategory::UserError,
        CoreCategory::Configuration => ErrorCategory::Configuration,
        CoreCategory::Process | CoreCategory::Io | CoreCategory::RemoteService => {
            ErrorCategory::Internal
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, unusable profile, existing directory).
    UserError,
    /// A required tool is missing.
    NotFound,
    /// Configuration error.
    Configuration,
    /// External or internal failure.
    Internal,
}
