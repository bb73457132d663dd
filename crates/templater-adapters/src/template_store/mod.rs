//! Template discovery adapters.

mod filesystem;

pub use filesystem::FilesystemTemplateStore;
