//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use cdkpipe_core::application::{IoFailure, ports::Filesystem};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can hand one clone to the service
/// and inspect the result through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_all(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.directories.insert(ancestor.to_path_buf());
        }
    }

    fn parent_exists(&self, path: &Path) -> bool {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.directories.contains(parent),
            _ => true,
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        let mut inner = self.write();
        if let Some(parent) = path.parent() {
            inner.add_dir_all(parent);
        }
        inner.files.insert(path.to_path_buf(), content.into());
    }

    /// Seed a directory and its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.write().add_dir_all(path.as_ref());
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().files.get(path.as_ref()).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir(&self, path: &Path) -> Result<(), IoFailure> {
        let mut inner = self.write();
        let failed = |reason: &str| IoFailure::CreateDirFailed {
            path: path.to_path_buf(),
            reason: reason.into(),
        };

        if inner.directories.contains(path) || inner.files.contains_key(path) {
            return Err(failed("already exists"));
        }
        if !inner.parent_exists(path) {
            return Err(failed("no such file or directory"));
        }

        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, IoFailure> {
        self.read()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| IoFailure::ReadFailed {
                path: path.to_path_buf(),
                reason: "no such file or directory".into(),
            })
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), IoFailure> {
        let mut inner = self.write();

        if !inner.parent_exists(path) {
            return Err(IoFailure::DestinationUnwritable {
                path: path.to_path_buf(),
                reason: "parent directory does not exist".into(),
            });
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), IoFailure> {
        let mut inner = self.write();
        let failed = |reason: &str| IoFailure::RenameFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            reason: reason.into(),
        };

        if !inner.parent_exists(to) {
            return Err(failed("target directory does not exist"));
        }
        let content = inner
            .files
            .remove(from)
            .ok_or_else(|| failed("no such file or directory"))?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), IoFailure> {
        self.write()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| IoFailure::RemoveFailed {
                path: path.to_path_buf(),
                reason: "no such file or directory".into(),
            })
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().directories.contains(path)
    }
}
