//! Validation mode - generate templates into a scratch area with their own
//! validation context, once per combination of the template's switches.
//!
//! A switch is a `bool` parameter the template declares and its
//! `validationContext` does not pin. With switches `a` and `b` a template is
//! generated four times, so a branch that only breaks with `a && !b` is still
//! caught.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    application::services::{GenerateOptions, Generator},
    domain::{Context, ParameterKind, TemplateName},
    error::{TemplaterError, TemplaterResult},
};

/// Upper bound on switches per template; 2^10 generations is already slow.
pub const MAX_SWITCHES: usize = 10;

/// Result for one switch combination of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ValidationOutcome {
    Passed { files: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateValidation {
    pub template: TemplateName,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub switches: BTreeMap<String, bool>,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// `Feature` or `Feature [useMocks=true, useRx=false]`.
impl fmt::Display for TemplateValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)?;
        if self.switches.is_empty() {
            return Ok(());
        }
        let switches: Vec<String> = self
            .switches
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        write!(f, " [{}]", switches.join(", "))
    }
}

/// Outcomes in registry order, one per template and switch combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    pub results: Vec<TemplateValidation>,
}

impl ValidationReport {
    pub fn passed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ValidationOutcome::Passed { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

pub struct Validator<'a> {
    generator: &'a Generator,
    validate_root: PathBuf,
}

impl<'a> Validator<'a> {
    pub fn new(generator: &'a Generator, validate_root: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            validate_root: validate_root.into(),
        }
    }

    /// Validate one template, or every registered template when `only` is
    /// `None`. A failing combination is reported and the run continues.
    #[instrument(skip(self, base), fields(root = %self.validate_root.display()))]
    pub fn validate(
        &self,
        only: Option<&TemplateName>,
        base: &Context,
    ) -> TemplaterResult<ValidationReport> {
        let names: Vec<TemplateName> = match only {
            Some(name) => vec![self.generator.registry().get(name)?.name.clone()],
            None => self
                .generator
                .registry()
                .discover()?
                .into_iter()
                .map(|t| t.name.clone())
                .collect(),
        };

        let mut report = ValidationReport::default();
        for name in names {
            match self.combinations(&name) {
                Ok(combinations) => {
                    for switches in combinations {
                        let outcome = self.run(&name, base, &switches);
                        report.results.push(TemplateValidation {
                            template: name.clone(),
                            switches,
                            outcome,
                        });
                    }
                }
                Err(e) => {
                    warn!(template = %name, error = %e, "template cannot be validated");
                    report.results.push(TemplateValidation {
                        template: name,
                        switches: BTreeMap::new(),
                        outcome: ValidationOutcome::Failed {
                            message: e.to_string(),
                        },
                    });
                }
            }
        }
        Ok(report)
    }

    /// Every assignment of the template's unpinned `bool` parameters; a
    /// single empty assignment when there are none.
    fn combinations(&self, name: &TemplateName) -> TemplaterResult<Vec<BTreeMap<String, bool>>> {
        let info = self.generator.registry().get(name)?;
        let switches: Vec<&str> = info
            .parameters()
            .iter()
            .filter(|p| p.kind == ParameterKind::Bool)
            .filter(|p| !info.descriptor.validation_context.contains(&p.name))
            .map(|p| p.name.as_str())
            .collect();

        if switches.len() > MAX_SWITCHES {
            return Err(TemplaterError::Configuration {
                message: format!(
                    "{} has {} switches, validation supports at most {MAX_SWITCHES}; pin some in validationContext",
                    name,
                    switches.len()
                ),
            });
        }

        Ok((0..1u32 << switches.len())
            .map(|bits| {
                switches
                    .iter()
                    .enumerate()
                    .map(|(i, switch)| ((*switch).to_owned(), bits & (1 << i) != 0))
                    .collect()
            })
            .collect())
    }

    fn run(
        &self,
        name: &TemplateName,
        base: &Context,
        switches: &BTreeMap<String, bool>,
    ) -> ValidationOutcome {
        match self.validate_one(name, base, switches) {
            Ok(files) => {
                info!(template = %name, ?switches, files, "template validated");
                ValidationOutcome::Passed { files }
            }
            Err(e) => {
                warn!(template = %name, ?switches, error = %e, "template failed validation");
                ValidationOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn validate_one(
        &self,
        name: &TemplateName,
        base: &Context,
        switches: &BTreeMap<String, bool>,
    ) -> TemplaterResult<usize> {
        let info = self.generator.registry().get(name)?;

        let mut context = base.snapshot();
        context.merge(&info.descriptor.validation_context)?;
        for (switch, value) in switches {
            context.set(switch.as_str(), *value)?;
        }
        let root = display(&self.validate_root);
        for key in ["projectPath", "sourcesPath", "testsPath", "locationPath"] {
            context.set(key, root.as_str())?;
        }

        let generation = self.generator.generate(
            name,
            &mut context,
            &GenerateOptions::new(&self.validate_root),
        )?;
        Ok(generation.manifest.len())
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
