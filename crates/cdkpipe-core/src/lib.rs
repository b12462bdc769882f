//! cdkpipe Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the cdkpipe
//! pipeline project scaffolder, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           cdkpipe-cli (CLI)             │
//! │   (Prompter, ProgressReporter, config)  │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, StepOrchestrator,    │
//! │   ProcessRunner, TemplateRenderer)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ProcessHost, CloudProvider)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    cdkpipe-adapters (Infrastructure)    │
//! │ (LocalFilesystem, SystemProcessHost,    │
//! │  AwsCliProvider, EmbeddedTemplates)     │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (PipelineContext, value objects, URLs)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cdkpipe_core::prelude::*;
//!
//! let service = ScaffoldService::new(filesystem, host, templates, cloud, reporter);
//! let mut ctx = service.prepare(&prompter, &PromptRequest::default(), workspace, false)?;
//! let report = service.scaffold(&mut ctx)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, Completion, IoFailure, ProcessFailure, ScaffoldReport,
        ScaffoldService, StepFailure,
        ports::{
            CloudProvider, CommandInvocation, CommandSpec, Filesystem, ProcessHost,
            ProcessStatus, ProgressReporter, PromptRequest, Prompter, RepositoryRequest,
            TemplateLibrary,
        },
    };
    pub use crate::domain::{
        AccountId, CdkVersion, GitProtocol, PipelineContext, ProjectAnswers, ProjectName,
        Region,
    };
    pub use crate::error::{ErrorCategory, ScaffoldError, ScaffoldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
