// ============================================================================
//  DOMAIN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Templater.
//!
//! Pure logic only: typed parameter context, descriptors, dependency
//! conditions, location markers, manifest entries and source-text analysis.
//! All I/O and rendering concerns are reached through ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem or external calls
//! - **Typed failures**: every fallible operation returns [`DomainError`]
pub mod analysis;
pub mod common;
pub mod context;
pub mod error;
pub mod expression;
pub mod location;
pub mod manifest;
pub mod parameter;
pub mod template;

pub use analysis::{DependencySet, declared_types};
pub use common::{capitalize, decapitalize};
pub use context::{Context, ParameterKind, ParameterValue};
pub use error::{DomainError, ErrorCategory};
pub use expression::{Expr, ExpressionError};
pub use location::{LocationMarker, ProjectPaths};
pub use manifest::{Manifest, ProcessedFile};
pub use parameter::{ParameterDescriptor, ParameterSet};
pub use template::{
    CONDITION_SEPARATOR, Condition, DESCRIPTOR_FILE, DependencyRef, TemplateDescriptor,
    TemplateInfo, TemplateName, TemplateStatus,
};
