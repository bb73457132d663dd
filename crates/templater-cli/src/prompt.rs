//! Terminal prompts for parameters the context does not provide.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use tracing::debug;

use templater_core::{
    application::ports::ParameterResolver,
    domain::{Context, DomainError, ParameterDescriptor, ParameterKind, ParameterValue},
    error::TemplaterResult,
};

/// Asks on the terminal, offering the declared default.
pub struct PromptResolver {
    theme: ColorfulTheme,
}

impl PromptResolver {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn ask(&self, descriptor: &ParameterDescriptor) -> Result<ParameterValue, dialoguer::Error> {
        let prompt = format!("{} ({})", descriptor.description, descriptor.name);

        let value = match descriptor.kind {
            ParameterKind::Bool => {
                let default = matches!(descriptor.default_value, Some(ParameterValue::Bool(true)));
                ParameterValue::Bool(
                    Confirm::with_theme(&self.theme)
                        .with_prompt(prompt)
                        .default(default)
                        .interact()?,
                )
            }
            ParameterKind::String => match &descriptor.possible_values {
                Some(allowed) if !allowed.is_empty() => {
                    let default = match &descriptor.default_value {
                        Some(ParameterValue::String(s)) => {
                            allowed.iter().position(|a| a == s).unwrap_or(0)
                        }
                        _ => 0,
                    };
                    let index = Select::with_theme(&self.theme)
                        .with_prompt(prompt)
                        .items(allowed.as_slice())
                        .default(default)
                        .interact()?;
                    ParameterValue::String(allowed[index].clone())
                }
                _ => {
                    let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
                    if let Some(ParameterValue::String(default)) = &descriptor.default_value {
                        input = input.default(default.clone());
                    }
                    ParameterValue::String(input.interact_text()?)
                }
            },
            ParameterKind::StringList => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(format!("{prompt}, comma separated"))
                    .allow_empty(true);
                if let Some(ParameterValue::StringList(default)) = &descriptor.default_value {
                    input = input.default(default.join(", "));
                }
                let raw = input.interact_text()?;
                ParameterValue::StringList(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_owned)
                        .collect(),
                )
            }
        };
        Ok(value)
    }
}

impl ParameterResolver for PromptResolver {
    fn resolve(
        &self,
        descriptor: &ParameterDescriptor,
        _context: &Context,
    ) -> TemplaterResult<ParameterValue> {
        debug!(parameter = %descriptor.name, "prompting");
        self.ask(descriptor).map_err(|e| {
            debug!(parameter = %descriptor.name, error = %e, "prompt aborted");
            DomainError::ParameterMissing {
                name: descriptor.name.clone(),
            }
            .into()
        })
    }
}
