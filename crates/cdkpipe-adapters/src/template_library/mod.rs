//! Template library adapters.
//!
//! The pipeline templates are compiled into the binary. A directory can be
//! layered on top to override individual files without rebuilding.

mod directory;
mod embedded;

pub use directory::{DirectoryTemplates, TEMPLATES_DIR_ENV, resolve_override_dir};
pub use embedded::EmbeddedTemplates;
