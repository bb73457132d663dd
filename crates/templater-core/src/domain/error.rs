// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (manifests and reports carry them around)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Argument Errors
    // ========================================================================
    #[error("unknown parameter '{name}': no descriptor declares it")]
    ParameterUnknown { name: String },

    #[error("parameter '{name}' is a {actual}, not a {requested}")]
    ParameterKindMismatch {
        name: String,
        requested: String,
        actual: String,
    },

    #[error("mandatory parameter '{name}' has no value")]
    ParameterMissing { name: String },

    #[error("value '{value}' is not allowed for '{name}' (expected one of: {allowed})")]
    InvalidParameterValue {
        name: String,
        value: String,
        allowed: String,
    },

    #[error("template '{name}' not found")]
    TemplateNotFound { name: String },

    // ========================================================================
    // Descriptor Errors
    // ========================================================================
    #[error("invalid descriptor {path}: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    #[error("parameter '{name}' redeclared as {redeclared}, originally {original}")]
    DefaultParameterOverride {
        name: String,
        original: String,
        redeclared: String,
    },

    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("location path {location} is not inside project path {project}")]
    PathInconsistency { location: PathBuf, project: PathBuf },

    #[error("{path} is not inside the project, sources, tests or location paths")]
    InvalidProjectFilePath { path: PathBuf },

    // ========================================================================
    // Dependency Errors
    // ========================================================================
    #[error("cyclic template dependency: {path}", path = .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ParameterUnknown { name } => vec![
                format!("No template in the dependency chain declares '{}'", name),
                "Check the spelling of -D arguments and context keys".into(),
            ],
            Self::ParameterKindMismatch { name, actual, .. } => vec![
                format!("'{}' already holds a {} value", name, actual),
                "Remove the conflicting value from the context file".into(),
            ],
            Self::ParameterMissing { name } => vec![
                format!("Pass it explicitly: -D {}=<value>", name),
                "Or run without --non-interactive to be prompted".into(),
            ],
            Self::InvalidParameterValue { allowed, .. } => {
                vec![format!("Allowed values: {}", allowed)]
            }
            Self::TemplateNotFound { .. } => vec![
                "Try: templater list to see available templates".into(),
                "Template names mirror their folder path, e.g. ios/viewModel".into(),
            ],
            Self::InvalidDescriptor { path, .. } => vec![
                format!("Fix the JSON in {}", path.display()),
                "Each parameter needs at least a name, type and description".into(),
            ],
            Self::DefaultParameterOverride { name, .. } => vec![
                format!("Rename '{}' or keep its original kind", name),
                "Built-in parameters cannot change kind".into(),
            ],
            Self::PathInconsistency { .. } => vec![
                "locationPath must be inside projectPath".into(),
                "Use a project-relative locationPath".into(),
            ],
            Self::InvalidProjectFilePath { .. } => vec![
                "Only files under the project, sources, tests or location paths can be prepared"
                    .into(),
            ],
            Self::CyclicDependency { .. } => vec![
                "Remove one of the dependencies forming the cycle".into(),
                "Dependencies are listed in each template.json".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParameterUnknown { .. }
            | Self::ParameterKindMismatch { .. }
            | Self::ParameterMissing { .. }
            | Self::InvalidParameterValue { .. }
            | Self::TemplateNotFound { .. } => ErrorCategory::Argument,
            Self::InvalidDescriptor { .. } | Self::DefaultParameterOverride { .. } => {
                ErrorCategory::Descriptor
            }
            Self::PathInconsistency { .. } | Self::InvalidProjectFilePath { .. } => {
                ErrorCategory::Path
            }
            Self::CyclicDependency { .. } => ErrorCategory::DependencyCycle,
        }
    }
}

/// Error kinds shared by every layer; the label prefixes user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Argument,
    Path,
    Descriptor,
    Render,
    DependencyCycle,
    Configuration,
    Internal,
}

impl ErrorCategory {
    /// Human-readable label used as a message prefix.
    pub fn label(self) -> &'static str {
        match self {
            Self::Argument => "argument error",
            Self::Path => "path error",
            Self::Descriptor => "descriptor error",
            Self::Render => "template-render error",
            Self::DependencyCycle => "dependency-cycle error",
            Self::Configuration => "configuration error",
            Self::Internal => "internal error",
        }
    }
}
