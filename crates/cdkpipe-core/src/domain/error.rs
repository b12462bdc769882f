// ============================================================================
// domain/error.rs - VALIDATION AND INVARIANT ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside step failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (rejected at the prompt boundary)
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: &'static str },

    #[error("Unsupported region '{0}'")]
    UnsupportedRegion(String),

    #[error("Account identifier is empty")]
    EmptyAccountId,

    // ========================================================================
    // Programming defects (configuration errors)
    // ========================================================================
    #[error("git protocol \"{0}\" not recognised")]
    UnknownProtocol(String),

    #[error("context field '{field}' was already set to '{existing}', refusing '{attempted}'")]
    FieldAlreadySet {
        field: &'static str,
        existing: String,
        attempted: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { .. } => vec![
                "Use kebab case: lowercase letters and digits separated by single hyphens".into(),
                "Start with a letter (e.g. my-pipeline-project)".into(),
            ],
            Self::UnsupportedRegion(region) => vec![
                format!("'{region}' is not a supported region"),
                format!(
                    "Supported regions: {}",
                    crate::domain::Region::ALL
                        .iter()
                        .map(|r| r.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            ],
            Self::EmptyAccountId => vec![
                "The credential profile did not resolve to an account".into(),
                "Run: aws sts get-caller-identity --profile <name>".into(),
            ],
            Self::UnknownProtocol(_) | Self::FieldAlreadySet { .. } => vec![
                "This appears to be a bug in cdkpipe".into(),
                "Please report this issue with the output of -vv".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::UnsupportedRegion(_) => {
                ErrorCategory::Validation
            }
            Self::EmptyAccountId => ErrorCategory::Identity,
            Self::UnknownProtocol(_) | Self::FieldAlreadySet { .. } => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Identity,
    Configuration,
}
