//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the engine needs from external systems.
//! The `templater-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{Context, ParameterDescriptor, ParameterValue, TemplateInfo};
use crate::error::TemplaterResult;

/// Immediate children of a folder, each list sorted by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `templater_adapters::filesystem::LocalFilesystem` (production)
/// - `templater_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Failures surface as `ApplicationError::NotFound`,
/// `ApplicationError::AlreadyExists` or `ApplicationError::FilesystemError`.
pub trait Filesystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> TemplaterResult<()>;

    /// Read a whole file.
    fn read_bytes(&self, path: &Path) -> TemplaterResult<Vec<u8>>;

    /// Write text, creating parent directories as needed.
    fn write_file(&self, path: &Path, content: &str) -> TemplaterResult<()>;

    /// Write raw bytes, creating parent directories as needed.
    fn write_bytes(&self, path: &Path, content: &[u8]) -> TemplaterResult<()>;

    /// Copy a file, creating parent directories of `to` as needed.
    fn copy_file(&self, from: &Path, to: &Path) -> TemplaterResult<()>;

    /// Move a file. Fails with `AlreadyExists` if `to` exists.
    fn rename(&self, from: &Path, to: &Path) -> TemplaterResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> TemplaterResult<()>;

    /// Empty a directory, keeping the directory itself. Creates it if missing.
    fn remove_dir_contents(&self, path: &Path) -> TemplaterResult<()>;

    /// List the immediate children of a directory.
    fn list_dir(&self, path: &Path) -> TemplaterResult<DirListing>;

    /// Every file below `root`, recursively, in sorted order.
    fn walk_files(&self, root: &Path) -> TemplaterResult<Vec<PathBuf>>;
}

/// Port for template discovery.
///
/// Implemented by:
/// - `templater_adapters::template_store::FilesystemTemplateStore`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Folder templates are discovered under.
    fn root(&self) -> PathBuf;

    /// Discover every template below [`TemplateStore::root`].
    fn load_all(&self) -> TemplaterResult<Vec<TemplateInfo>>;
}

/// Failure reported by a [`TextRenderer`], without file context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Port for the text-templating sub-system.
///
/// Implemented by:
/// - `templater_adapters::renderer::TeraRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TextRenderer: Send + Sync {
    /// Render `text` against `context`.
    fn render(&self, text: &str, context: &Context) -> Result<String, RenderError>;
}

/// Port for resolving a mandatory parameter the context does not hold.
///
/// Implemented by:
/// - `templater_adapters::resolver::DefaultsResolver` (non-interactive)
/// - the CLI's terminal prompt resolver
#[cfg_attr(test, mockall::automock)]
pub trait ParameterResolver: Send + Sync {
    fn resolve(
        &self,
        descriptor: &ParameterDescriptor,
        context: &Context,
    ) -> TemplaterResult<ParameterValue>;
}
