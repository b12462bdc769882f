//! Infrastructure adapters for cdkpipe.
//!
//! This crate implements the ports defined in `cdkpipe-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod aws;
pub mod filesystem;
pub mod process;
pub mod template_library;

// Re-export commonly used adapters
pub use aws::AwsCliProvider;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{ScriptedProcessHost, SystemProcessHost};
pub use template_library::{DirectoryTemplates, EmbeddedTemplates};
