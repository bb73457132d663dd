//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! generate, prepare and validate runs.

pub mod analyzer;
pub mod apply;
pub mod generator;
pub mod parameters;
pub mod preparator;
pub mod registry;
pub mod validator;

pub use analyzer::{DefinitionLookup, DependencyAnalyzer};
pub use apply::{ApplyTarget, apply_manifest};
pub use generator::{GenerateOptions, Generation, Generator};
pub use parameters::ParameterService;
pub use preparator::{PrepareReport, PrepareRequest, Preparator};
pub use registry::TemplateRegistry;
pub use validator::{TemplateValidation, ValidationOutcome, ValidationReport, Validator};
