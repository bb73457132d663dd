//! Parameter resolution against the context.
//!
//! A value comes from the context, else from a descriptor default that need
//! not be confirmed, else from the injected [`ParameterResolver`]. Every value
//! obtained that way is written back so it is asked at most once per run.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::ParameterResolver,
    domain::{Context, DomainError, ParameterKind, ParameterSet, ParameterValue},
    error::TemplaterResult,
};

pub struct ParameterService {
    resolver: Arc<dyn ParameterResolver>,
}

impl ParameterService {
    pub fn new(resolver: Arc<dyn ParameterResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve `name`, writing the value back into `context`.
    ///
    /// Fails with `ParameterUnknown` when no descriptor declares the name and
    /// with `ParameterKindMismatch` when the stored value has another kind.
    pub fn get(
        &self,
        context: &mut Context,
        parameters: &ParameterSet,
        name: &str,
    ) -> TemplaterResult<ParameterValue> {
        let descriptor = parameters.require(name)?;

        if let Some(value) = context.get(name) {
            descriptor.validate(value)?;
            return Ok(value.clone());
        }

        let value = match descriptor.silent_default() {
            Some(default) => default.clone(),
            None => self.resolver.resolve(descriptor, context)?,
        };
        descriptor.validate(&value)?;
        context.set(name, value.clone())?;
        debug!(parameter = name, "parameter resolved");
        Ok(value)
    }

    pub fn get_bool(
        &self,
        context: &mut Context,
        parameters: &ParameterSet,
        name: &str,
    ) -> TemplaterResult<bool> {
        match self.get(context, parameters, name)? {
            ParameterValue::Bool(b) => Ok(b),
            other => Err(kind_error(name, ParameterKind::Bool, &other)),
        }
    }

    pub fn get_string(
        &self,
        context: &mut Context,
        parameters: &ParameterSet,
        name: &str,
    ) -> TemplaterResult<String> {
        match self.get(context, parameters, name)? {
            ParameterValue::String(s) => Ok(s),
            other => Err(kind_error(name, ParameterKind::String, &other)),
        }
    }

    pub fn get_string_list(
        &self,
        context: &mut Context,
        parameters: &ParameterSet,
        name: &str,
    ) -> TemplaterResult<Vec<String>> {
        match self.get(context, parameters, name)? {
            ParameterValue::StringList(list) => Ok(list),
            other => Err(kind_error(name, ParameterKind::StringList, &other)),
        }
    }

    /// Fill every unset mandatory parameter, plus optional ones whose default
    /// needs no confirmation.
    #[instrument(skip_all, fields(declared = parameters.len()))]
    pub fn resolve_missing(
        &self,
        context: &mut Context,
        parameters: &ParameterSet,
    ) -> TemplaterResult<()> {
        for descriptor in parameters.iter() {
            if context.contains(&descriptor.name) {
                continue;
            }
            if descriptor.mandatory || descriptor.silent_default().is_some() {
                self.get(context, parameters, &descriptor.name)?;
            }
        }
        Ok(())
    }
}

fn kind_error(name: &str, requested: ParameterKind, got: &ParameterValue) -> crate::error::TemplaterError {
    DomainError::ParameterKindMismatch {
        name: name.to_owned(),
        requested: requested.to_string(),
        actual: got.kind().to_string(),
    }
    .into()
}
