//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use templater_core::{
    application::{
        ApplicationError,
        ports::{DirListing, Filesystem},
    },
    error::{TemplaterError, TemplaterResult},
};
use walkdir::WalkDir;

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
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> TemplaterResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_bytes(&self, path: &Path) -> TemplaterResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> TemplaterResult<()> {
        self.write_bytes(path, content.as_bytes())
    }

    fn write_bytes(&self, path: &Path, content: &[u8]) -> TemplaterResult<()> {
        ensure_parent(path)?;
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> TemplaterResult<()> {
        ensure_parent(to)?;
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> TemplaterResult<()> {
        if to.exists() {
            return Err(ApplicationError::AlreadyExists {
                path: to.to_path_buf(),
            }
            .into());
        }
        ensure_parent(to)?;
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename file"))
    }

    fn remove_file(&self, path: &Path) -> TemplaterResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_contents(&self, path: &Path) -> TemplaterResult<()> {
        if !path.exists() {
            return self.create_dir_all(path);
        }
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory entry"))?;
            let child = entry.path();
            let result = if child.is_dir() {
                std::fs::remove_dir_all(&child)
            } else {
                std::fs::remove_file(&child)
            };
            result.map_err(|e| map_io_error(&child, e, "remove"))?;
        }
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> TemplaterResult<DirListing> {
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;

        let mut listing = DirListing::default();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory entry"))?;
            let child = entry.path();
            if child.is_dir() {
                listing.dirs.push(child);
            } else if child.is_file() {
                listing.files.push(child);
            }
        }
        listing.files.sort();
        listing.dirs.sort();
        Ok(listing)
    }

    fn walk_files(&self, root: &Path) -> TemplaterResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                TemplaterError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk directory: {e}"),
                })
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn ensure_parent(path: &Path) -> TemplaterResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| map_io_error(parent, e, "create directory")),
        _ => Ok(()),
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> TemplaterError {
    let path = path.to_path_buf();
    match e.kind() {
        io::ErrorKind::NotFound => ApplicationError::NotFound { path },
        io::ErrorKind::AlreadyExists => ApplicationError::AlreadyExists { path },
        _ => ApplicationError::FilesystemError {
            path,
            reason: format!("Failed to {}: {}", operation, e),
        },
    }
    .into()
}
