//! Application layer for Templater.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (Generator, Preparator, Validator)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. All rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ApplyTarget, DefinitionLookup, DependencyAnalyzer, GenerateOptions, Generation, Generator,
    ParameterService, PrepareReport, PrepareRequest, Preparator, TemplateRegistry,
    ValidationOutcome, ValidationReport, Validator, apply_manifest,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    DirListing, Filesystem, ParameterResolver, RenderError, TemplateStore, TextRenderer,
};

pub use error::ApplicationError;
