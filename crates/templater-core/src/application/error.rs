//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the ports
//! (filesystem, rendering, template discovery), not rule violations.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A path the run needs does not exist.
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    /// A path the run would create already exists.
    #[error("already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Any other filesystem failure.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The templating engine rejected a file or a name.
    #[error("{template_path}: {reason}")]
    RenderingFailed {
        template_path: PathBuf,
        reason: String,
    },

    /// The template store could not be read.
    #[error("template store error: {reason}")]
    StoreError { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotFound { path } => vec![
                format!("Missing: {}", path.display()),
                "Check the paths section of templater.toml".into(),
            ],
            Self::AlreadyExists { path } => vec![
                format!("Remove or move {} and try again", path.display()),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::RenderingFailed { template_path, .. } => vec![
                format!("Fix the template syntax in {}", template_path.display()),
                "Every variable used must be a parameter of the template chain".into(),
            ],
            Self::StoreError { .. } => vec![
                "Check that the templates folder exists and is readable".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::AlreadyExists { .. } => ErrorCategory::Path,
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::RenderingFailed { .. } => ErrorCategory::Render,
            Self::StoreError { .. } => ErrorCategory::Path,
        }
    }
}
