//! Tera-based text renderer.
//!
//! Adds three filters on top of Tera's built-ins:
//! `capitalized` and `decapitalized` change the case of the first character,
//! `comma` joins a string list with `", "`.

use std::collections::HashMap;
use std::error::Error as _;

use tera::{Tera, Value};
use tracing::trace;

use templater_core::{
    application::ports::{RenderError, TextRenderer},
    domain::{Context, capitalize, decapitalize},
};

/// Renders template text and names with Tera.
#[derive(Clone)]
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.register_filter("capitalized", capitalized_filter);
        tera.register_filter("decapitalized", decapitalized_filter);
        tera.register_filter("comma", comma_filter);
        Self { tera }
    }
}

impl Default for TeraRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer for TeraRenderer {
    fn render(&self, text: &str, context: &Context) -> Result<String, RenderError> {
        if !text.contains("{{") && !text.contains("{%") && !text.contains("{#") {
            return Ok(text.to_owned());
        }

        let tera_context =
            tera::Context::from_serialize(context).map_err(|e| RenderError(describe(&e)))?;
        // `render_str` needs a mutable engine; the clone shares nothing.
        let mut tera = self.tera.clone();
        let rendered = tera
            .render_str(text, &tera_context)
            .map_err(|e| RenderError(describe(&e)))?;
        trace!(bytes = rendered.len(), "rendered text");
        Ok(rendered)
    }
}

/// Tera keeps the useful part of a failure in the source chain.
fn describe(e: &tera::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// ---- Filters ----

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("filter `{filter}` expects a string, got {value}")))
}

fn capitalized_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(capitalize(string_arg(value, "capitalized")?)))
}

fn decapitalized_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(decapitalize(string_arg(value, "decapitalized")?)))
}

fn comma_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            Ok(Value::String(parts.join(", ")))
        }
        Value::String(s) => Ok(Value::String(s.clone())),
        other => Err(tera::Error::msg(format!(
            "filter `comma` expects a list, got {other}"
        ))),
    }
}
