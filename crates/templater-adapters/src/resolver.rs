//! Non-interactive parameter resolution.

use tracing::debug;

use templater_core::{
    application::ports::ParameterResolver,
    domain::{Context, DomainError, ParameterDescriptor, ParameterValue},
    error::TemplaterResult,
};

/// Resolves a parameter from its declared default, failing with
/// `ParameterMissing` when there is none.
///
/// Used when no terminal is available or prompting is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsResolver;

impl DefaultsResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ParameterResolver for DefaultsResolver {
    fn resolve(
        &self,
        descriptor: &ParameterDescriptor,
        _context: &Context,
    ) -> TemplaterResult<ParameterValue> {
        match &descriptor.default_value {
            Some(value) => {
                debug!(parameter = %descriptor.name, "using declared default");
                Ok(value.clone())
            }
            None => Err(DomainError::ParameterMissing {
                name: descriptor.name.clone(),
            }
            .into()),
        }
    }
}
