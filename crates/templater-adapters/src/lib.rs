//! Infrastructure adapters for Templater.
//!
//! This crate implements the ports defined in `templater_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod renderer;
pub mod resolver;
pub mod template_store;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::TeraRenderer;
pub use resolver::DefaultsResolver;
pub use template_store::FilesystemTemplateStore;
