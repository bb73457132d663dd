//! Template identity, descriptor schema and dependency references.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Context, DomainError, Expr, ExpressionError, ParameterDescriptor};

/// File that marks a folder as a template.
pub const DESCRIPTOR_FILE: &str = "template.json";

/// Separator between a dependency name and its condition.
pub const CONDITION_SEPARATOR: &str = "<=>";

// ── Identity ──────────────────────────────────────────────────────────────────

/// Slash-separated template name mirroring its folder under the template root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self(name.trim_matches('/').to_owned())
    }

    /// Build a name from a folder path relative to the template root.
    pub fn from_relative(path: &Path) -> Self {
        let joined = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form used in persisted context file names (`/` is not allowed there).
    pub fn file_safe(&self) -> String {
        self.0.replace('/', "\\")
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Lifecycle status of a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Passing,
    Failing,
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Passing => write!(f, "passing"),
            Self::Failing => write!(f, "failing"),
        }
    }
}

// ── Descriptor ────────────────────────────────────────────────────────────────

/// Deserialized `template.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TemplateStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefer_original_location: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    pub validation_context: Context,
    #[serde(default)]
    pub derived_from: Option<String>,
}

impl TemplateDescriptor {
    /// Parse and validate descriptor JSON read from `path`.
    pub fn parse(path: &Path, json: &[u8]) -> Result<Self, DomainError> {
        let invalid = |reason: String| DomainError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason,
        };

        let descriptor: Self = serde_json::from_slice(json).map_err(|e| invalid(e.to_string()))?;

        for param in &descriptor.parameters {
            param.check().map_err(&invalid)?;
        }
        for raw in &descriptor.dependencies {
            if DependencyRef::parse(raw).name.as_str().is_empty() {
                return Err(invalid(format!("dependency '{raw}' has no template name")));
            }
        }
        Ok(descriptor)
    }

    /// Serialize for writing back to disk.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// ── Dependencies ──────────────────────────────────────────────────────────────

/// When a dependency applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Always,
    When(Expr),
    /// Condition text that failed to parse; the dependency is skipped.
    Malformed(ExpressionError),
}

/// One entry of a descriptor's `dependencies` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub name: TemplateName,
    pub condition: Condition,
}

impl DependencyRef {
    /// Parse `name` or `name <=> condition`.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(CONDITION_SEPARATOR) {
            None => Self {
                name: TemplateName::new(raw.trim()),
                condition: Condition::Always,
            },
            Some((name, expr)) => Self {
                name: TemplateName::new(name.trim()),
                condition: match Expr::parse(expr.trim()) {
                    Ok(expr) => Condition::When(expr),
                    Err(e) => Condition::Malformed(e),
                },
            },
        }
    }
}

// ── Registered template ───────────────────────────────────────────────────────

/// A discovered template: its name, folder and validated descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInfo {
    pub name: TemplateName,
    pub folder: PathBuf,
    pub descriptor: TemplateDescriptor,
    pub dependencies: Vec<DependencyRef>,
}

impl TemplateInfo {
    pub fn new(name: TemplateName, folder: impl Into<PathBuf>, descriptor: TemplateDescriptor) -> Self {
        let dependencies = descriptor
            .dependencies
            .iter()
            .map(|d| DependencyRef::parse(d))
            .collect();
        Self {
            name,
            folder: folder.into(),
            descriptor,
            dependencies,
        }
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.descriptor.parameters
    }

    pub fn prefers_original_location(&self, file_name: &str) -> bool {
        self.descriptor
            .prefer_original_location
            .iter()
            .any(|f| f == file_name)
    }
}
