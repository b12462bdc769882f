//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `cdkpipe-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations under the project root
//!   - `ProcessHost`: Child process execution
//!   - `TemplateLibrary`: Raw template contents
//!   - `CloudProvider`: Account identity and repository creation
//!   - `ProgressReporter`: Operator-facing step progress
//!   - `Prompter`: Collection of the validated answer set

pub mod output;

pub use output::{
    CloudProvider, CommandInvocation, CommandSpec, Filesystem, ProcessHost, ProcessStatus,
    ProgressReporter, PromptRequest, Prompter, RepositoryRequest, TemplateLibrary, display_args,
};

#[cfg(test)]
pub use output::{
    MockCloudProvider, MockFilesystem, MockProcessHost, MockProgressReporter, MockPrompter,
    MockTemplateLibrary,
};
