//! Templater Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of the template
//! generation and reverse-extraction engine, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           templater-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Generator, Preparator, Validator)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Store, Filesystem, Renderer, Resolver) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   templater-adapters (Infrastructure)   │
//! │ (LocalFilesystem, TeraRenderer, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Context, TemplateInfo, ProjectPaths)  │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use templater_core::prelude::*;
//!
//! let registry = Arc::new(TemplateRegistry::new(Box::new(store)));
//! let generator = Generator::new(registry, fs, renderer, ParameterService::new(resolver));
//!
//! let mut context = Context::new();
//! context.set("name", "Login")?;
//! let generation = generator.generate(&"Feature".into(), &mut context, &GenerateOptions::new("Generate"))?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplyTarget, DependencyAnalyzer, GenerateOptions, Generation, Generator, ParameterService,
        PrepareReport, PrepareRequest, Preparator, TemplateRegistry, ValidationReport, Validator,
        apply_manifest,
        ports::{Filesystem, ParameterResolver, TemplateStore, TextRenderer},
    };
    pub use crate::domain::{
        Context, Manifest, ParameterDescriptor, ParameterKind, ParameterSet, ParameterValue,
        ProcessedFile, TemplateDescriptor, TemplateInfo, TemplateName,
    };
    pub use crate::error::{TemplaterError, TemplaterResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
