//! Templates read from a directory on disk.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::{debug, instrument};

use cdkpipe_core::application::{IoFailure, ports::TemplateLibrary};

use super::EmbeddedTemplates;

/// Environment variable naming a template override directory.
pub const TEMPLATES_DIR_ENV: &str = "CDKPIPE_TEMPLATES_DIR";

/// Pick the override directory: the environment variable wins over the
/// configured path. Returns `None` when neither is set.
pub fn resolve_override_dir(configured: Option<&Path>) -> Option<PathBuf> {
    match std::env::var_os(TEMPLATES_DIR_ENV) {
        Some(dir) if !dir.is_empty() => {
            debug!(dir = ?dir, "template override from ${}", TEMPLATES_DIR_ENV);
            Some(PathBuf::from(dir))
        }
        _ => configured.map(Path::to_path_buf),
    }
}

/// Reads `<root>/<name>`, falling back to the built-in template when the
/// file is absent and a fallback is configured.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
    fallback: Option<EmbeddedTemplates>,
}

impl DirectoryTemplates {
    /// Only the directory; a missing file is an error.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: None,
        }
    }

    /// The directory layered over the built-in templates.
    pub fn over_embedded(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: Some(EmbeddedTemplates::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateLibrary for DirectoryTemplates {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self, name: &str) -> Result<String, IoFailure> {
        let relative = Path::new(name);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(IoFailure::TemplateUnreadable {
                template: name.to_string(),
                reason: "template names must be relative paths inside the library".into(),
            });
        }

        let path = self.root.join(relative);
        match (fs::read_to_string(&path), &self.fallback) {
            (Ok(content), _) => {
                debug!(path = %path.display(), "template loaded from override directory");
                Ok(content)
            }
            (Err(e), Some(fallback)) if e.kind() == std::io::ErrorKind::NotFound => {
                fallback.load(name)
            }
            (Err(e), _) => Err(IoFailure::TemplateUnreadable {
                template: name.to_string(),
                reason: format!("{}: {e}", path.display()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_file_wins_over_builtin() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::write(tmp.path().join("lib/pipeline-stack.ts"), "// custom").unwrap();

        let library = DirectoryTemplates::over_embedded(tmp.path());
        assert_eq!(library.load("lib/pipeline-stack.ts").unwrap(), "// custom");
        // Files not overridden come from the binary.
        assert!(library
            .load("bin/pipeline.ts")
            .unwrap()
            .contains("{{project_name}}"));
    }

    #[test]
    fn directory_without_fallback_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = DirectoryTemplates::new(tmp.path())
            .load("bin/pipeline.ts")
            .unwrap_err();
        assert!(matches!(err, IoFailure::TemplateUnreadable { .. }));
    }

    #[test]
    fn escaping_names_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let library = DirectoryTemplates::over_embedded(tmp.path());
        for name in ["../secret", "/etc/passwd", "lib/../../x"] {
            assert!(library.load(name).is_err(), "accepted {name}");
        }
    }

    #[test]
    fn configured_dir_used_when_env_unset() {
        // Only meaningful when the variable is not set by the environment.
        if std::env::var_os(TEMPLATES_DIR_ENV).is_none() {
            assert_eq!(
                resolve_override_dir(Some(Path::new("/opt/templates"))),
                Some(PathBuf::from("/opt/templates"))
            );
            assert_eq!(resolve_override_dir(None), None);
        }
    }
}
