//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use cdkpipe_core::application::{IoFailure, ports::Filesystem};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> Result<(), IoFailure> {
        std::fs::create_dir(path).map_err(|e| IoFailure::CreateDirFailed {
            path: path.to_path_buf(),
            reason: describe(e),
        })
    }

    fn read_to_string(&self, path: &Path) -> Result<String, IoFailure> {
        std::fs::read_to_string(path).map_err(|e| IoFailure::ReadFailed {
            path: path.to_path_buf(),
            reason: describe(e),
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), IoFailure> {
        std::fs::write(path, content).map_err(|e| IoFailure::DestinationUnwritable {
            path: path.to_path_buf(),
            reason: describe(e),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), IoFailure> {
        std::fs::rename(from, to).map_err(|e| IoFailure::RenameFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: describe(e),
        })
    }

    fn remove_file(&self, path: &Path) -> Result<(), IoFailure> {
        std::fs::remove_file(path).map_err(|e| IoFailure::RemoveFailed {
            path: path.to_path_buf(),
            reason: describe(e),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

fn describe(e: io::Error) -> String {
    match e.kind() {
        io::ErrorKind::AlreadyExists => "already exists".into(),
        io::ErrorKind::NotFound => "no such file or directory".into(),
        io::ErrorKind::PermissionDenied => "permission denied".into(),
        _ => e.to_string(),
    }
}
