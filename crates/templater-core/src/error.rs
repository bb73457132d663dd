//! Unified error handling for Templater Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions and a category used for message
//! labels and exit codes.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

pub use crate::domain::ErrorCategory;

/// Root error type for Templater Core operations.
#[derive(Debug, Error, Clone)]
pub enum TemplaterError {
    /// Errors from the domain layer (rule violations).
    #[error("{label}: {0}", label = .0.category().label())]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O and rendering).
    #[error("{label}: {0}", label = .0.category().label())]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl TemplaterError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Templater".into(),
                "Please report this issue at: https://github.com/cosecruz/templater/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Convenient result type alias.
pub type TemplaterResult<T> = Result<T, TemplaterError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> TemplaterResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> TemplaterResult<T> {
        self.map_err(|e| TemplaterError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
