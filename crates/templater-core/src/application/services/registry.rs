//! Template Registry - discovery cache and dependency resolution.
//!
//! Templates are loaded from the [`TemplateStore`] on first lookup and
//! cached for the rest of the run.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::TemplateStore,
    domain::{Condition, Context, DomainError, ParameterSet, TemplateInfo, TemplateName},
    error::TemplaterResult,
};

/// Memoized name → template map plus dependency expansion.
pub struct TemplateRegistry {
    store: Box<dyn TemplateStore>,
    cache: OnceLock<BTreeMap<TemplateName, TemplateInfo>>,
}

impl TemplateRegistry {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self {
            store,
            cache: OnceLock::new(),
        }
    }

    /// Folder the templates live under.
    pub fn root(&self) -> PathBuf {
        self.store.root()
    }

    /// Every discovered template, sorted by name.
    pub fn discover(&self) -> TemplaterResult<Vec<&TemplateInfo>> {
        Ok(self.templates()?.values().collect())
    }

    /// Look up one template by name.
    pub fn get(&self, name: &TemplateName) -> TemplaterResult<&TemplateInfo> {
        self.templates()?.get(name).ok_or_else(|| {
            DomainError::TemplateNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Expand `name` into itself followed by its transitive dependencies.
    ///
    /// Depth-first, each template before its dependencies. A conditional
    /// dependency is included only when its condition is true; unset names
    /// read as false and malformed conditions are skipped with a warning.
    /// A template reached twice is kept at its first position.
    #[instrument(skip(self, context), fields(template = %name))]
    pub fn resolve_with_dependencies(
        &self,
        name: &TemplateName,
        context: &Context,
    ) -> TemplaterResult<Vec<TemplateName>> {
        let mut stack = Vec::new();
        let mut order = Vec::new();
        self.visit(name, context, &mut stack, &mut order)?;
        debug!(resolved = ?order.iter().map(TemplateName::as_str).collect::<Vec<_>>(), "dependencies resolved");
        Ok(order)
    }

    /// Built-in parameters merged with every template's declarations, in order.
    pub fn parameters_for(&self, names: &[TemplateName]) -> TemplaterResult<ParameterSet> {
        let mut set = ParameterSet::builtin();
        for name in names {
            set.merge(self.get(name)?.parameters())?;
        }
        Ok(set)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn templates(&self) -> TemplaterResult<&BTreeMap<TemplateName, TemplateInfo>> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let loaded: BTreeMap<_, _> = self
            .store
            .load_all()?
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        debug!(count = loaded.len(), "template registry populated");

        Ok(self.cache.get_or_init(|| loaded))
    }

    fn visit(
        &self,
        name: &TemplateName,
        context: &Context,
        stack: &mut Vec<TemplateName>,
        order: &mut Vec<TemplateName>,
    ) -> TemplaterResult<()> {
        if stack.contains(name) {
            let mut chain: Vec<String> = stack.iter().map(ToString::to_string).collect();
            chain.push(name.to_string());
            return Err(DomainError::CyclicDependency { chain }.into());
        }
        if order.contains(name) {
            return Ok(());
        }

        let info = self.get(name)?;
        order.push(name.clone());
        stack.push(name.clone());

        for dep in &info.dependencies {
            let include = match &dep.condition {
                Condition::Always => true,
                Condition::When(expr) => {
                    let lookup = |var: &str| context.bool(var).ok().flatten();
                    expr.evaluate(&lookup)
                }
                Condition::Malformed(err) => {
                    warn!(template = %name, dependency = %dep.name, error = %err, "skipping dependency with malformed condition");
                    false
                }
            };

            if include {
                self.visit(&dep.name, context, stack, order)?;
            } else {
                debug!(template = %name, dependency = %dep.name, "conditional dependency not selected");
            }
        }

        stack.pop();
        Ok(())
    }
}
