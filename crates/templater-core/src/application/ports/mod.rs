//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `templater-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore`: Template discovery
//!   - `TextRenderer`: Template expression rendering
//!   - `ParameterResolver`: Values for missing mandatory parameters
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    DirListing, Filesystem, ParameterResolver, RenderError, TemplateStore, TextRenderer,
};

#[cfg(test)]
pub use output::{MockParameterResolver, MockTemplateStore, MockTextRenderer};
