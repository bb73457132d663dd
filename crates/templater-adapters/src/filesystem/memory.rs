//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use templater_core::{
    application::{
        ApplicationError,
        ports::{DirListing, Filesystem},
    },
    error::{TemplaterError, TemplaterResult},
};

/// In-memory filesystem for testing.
///
/// Cloning shares the underlying tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dir_chain(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn add_file(&mut self, path: &Path, content: Vec<u8>) {
        if let Some(parent) = path.parent() {
            self.add_dir_chain(parent);
        }
        self.files.insert(path.to_path_buf(), content);
    }

    fn read(&self, path: &Path) -> TemplaterResult<&Vec<u8>> {
        self.files.get(path).ok_or_else(|| {
            ApplicationError::NotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a text file (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.add_file(path.as_ref(), content.as_bytes().to_vec());
        }
        self
    }

    /// Read a file's content as text (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .and_then(|b| String::from_utf8(b.clone()).ok())
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read_lock(&self) -> TemplaterResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write_lock(&self) -> TemplaterResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    fn create_dir_all(&self, path: &Path) -> TemplaterResult<()> {
        self.write_lock()?.add_dir_chain(path);
        Ok(())
    }

    fn read_bytes(&self, path: &Path) -> TemplaterResult<Vec<u8>> {
        self.read_lock()?.read(path).cloned()
    }

    fn write_file(&self, path: &Path, content: &str) -> TemplaterResult<()> {
        self.write_bytes(path, content.as_bytes())
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> TemplaterResult<()> {
        self.write_lock()?.add_file(path, content.to_vec());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> TemplaterResult<()> {
        let mut inner = self.write_lock()?;
        let content = inner.read(from)?.clone();
        inner.add_file(to, content);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> TemplaterResult<()> {
        let mut inner = self.write_lock()?;
        if inner.files.contains_key(to) {
            return Err(ApplicationError::AlreadyExists {
                path: to.to_path_buf(),
            }
            .into());
        }
        let content = inner.files.remove(from).ok_or_else(|| ApplicationError::NotFound {
            path: from.to_path_buf(),
        })?;
        inner.add_file(to, content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> TemplaterResult<()> {
        let mut inner = self.write_lock()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| {
                ApplicationError::NotFound {
                    path: path.to_path_buf(),
                }
                .into()
            })
    }

    fn remove_dir_contents(&self, path: &Path) -> TemplaterResult<()> {
        let mut inner = self.write_lock()?;
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.directories.retain(|p| p == path || !p.starts_with(path));
        inner.add_dir_chain(path);
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> TemplaterResult<DirListing> {
        let inner = self.read_lock()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let is_child = |p: &&PathBuf| p.parent() == Some(path);
        Ok(DirListing {
            files: inner.files.keys().filter(is_child).cloned().collect(),
            dirs: inner.directories.iter().filter(is_child).cloned().collect(),
        })
    }

    fn walk_files(&self, root: &Path) -> TemplaterResult<Vec<PathBuf>> {
        let inner = self.read_lock()?;
        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }
}

fn poisoned() -> TemplaterError {
    TemplaterError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_returns_direct_children_only() {
        let fs = MemoryFilesystem::new()
            .with_file("/t/A/a.txt", "a")
            .with_file("/t/A/_sources/b.txt", "b");

        let listing = fs.list_dir(Path::new("/t/A")).unwrap();
        assert_eq!(listing.files, vec![PathBuf::from("/t/A/a.txt")]);
        assert_eq!(listing.dirs, vec![PathBuf::from("/t/A/_sources")]);
    }

    #[test]
    fn remove_dir_contents_clears_below_root() {
        let fs = MemoryFilesystem::new()
            .with_file("/s/x/y.txt", "1")
            .with_file("/other.txt", "2");

        fs.remove_dir_contents(Path::new("/s")).unwrap();
        assert!(fs.is_dir(Path::new("/s")));
        assert!(!fs.exists(Path::new("/s/x")));
        assert_eq!(fs.list_files(), vec![PathBuf::from("/other.txt")]);
    }

    #[test]
    fn rename_refuses_to_overwrite() {
        let fs = MemoryFilesystem::new()
            .with_file("/a", "1")
            .with_file("/b", "2");
        assert!(fs.rename(Path::new("/a"), Path::new("/b")).is_err());
        fs.rename(Path::new("/a"), Path::new("/c")).unwrap();
        assert_eq!(fs.read_file(Path::new("/c")).as_deref(), Some("1"));
    }
}
