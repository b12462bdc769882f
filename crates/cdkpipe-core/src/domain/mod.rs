//! Core domain layer for cdkpipe.
//!
//! Pure logic with no I/O: validated value objects, the pipeline context,
//! remote URL resolution, and placeholder rendering. Everything that touches
//! the filesystem, child processes, or the network goes through the ports
//! defined in the application layer.

pub mod context;
pub mod error;
pub mod remote;
pub mod render;
pub mod value_objects;

pub use context::{PipelineContext, ProjectAnswers};
pub use error::{DomainError, ErrorCategory};
pub use remote::{pipeline_console_url, resolve_remote_url, resolve_remote_url_str};
pub use render::RenderContext;
pub use value_objects::{AccountId, CdkVersion, GitProtocol, ProjectName, Region};
