//! Template rendering into the generated project.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::{
        error::IoFailure,
        ports::{Filesystem, TemplateLibrary},
    },
    domain::RenderContext,
};

/// One template to render into one destination file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateJob {
    /// Library path of the template, e.g. `bin/pipeline.ts`.
    pub source: String,
    pub context: RenderContext,
    pub destination: PathBuf,
}

impl TemplateJob {
    pub fn new(
        source: impl Into<String>,
        context: RenderContext,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            context,
            destination: destination.into(),
        }
    }
}

/// Loads templates from a [`TemplateLibrary`] and writes them through a
/// [`Filesystem`].
pub struct TemplateRenderer<'a> {
    library: &'a dyn TemplateLibrary,
    fs: &'a dyn Filesystem,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(library: &'a dyn TemplateLibrary, fs: &'a dyn Filesystem) -> Self {
        Self { library, fs }
    }

    /// Substitute the job's variables into its template and write the result.
    #[instrument(skip_all, fields(template = %job.source, destination = %job.destination.display()))]
    pub fn render(&self, job: &TemplateJob) -> Result<(), IoFailure> {
        let template = self.library.load(&job.source)?;
        let rendered = job.context.render(&template);
        self.write(&job.destination, &rendered)?;
        debug!(bytes = rendered.len(), "template rendered");
        Ok(())
    }

    /// Write a template verbatim, with no substitution.
    #[instrument(skip(self), fields(destination = %destination.display()))]
    pub fn copy(&self, source: &str, destination: &Path) -> Result<(), IoFailure> {
        let content = self.library.load(source)?;
        self.write(destination, &content)
    }

    fn write(&self, destination: &Path, content: &str) -> Result<(), IoFailure> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.is_dir(parent) {
                return Err(IoFailure::DestinationMissing {
                    path: parent.to_path_buf(),
                });
            }
        }

        self.fs
            .write_file(destination, content)
            .map_err(|e| match e {
                IoFailure::DestinationUnwritable { .. } => e,
                other => IoFailure::DestinationUnwritable {
                    path: destination.to_path_buf(),
                    reason: other.to_string(),
                },
            })
    }
}
