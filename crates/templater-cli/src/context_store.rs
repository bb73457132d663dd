//! Saving and loading run contexts as flat JSON objects.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use templater_core::domain::{Context, TemplateName};

use crate::error::{CliResult, IntoCli};

/// File written when the context names neither an item nor a template.
pub const FALLBACK_FILE: &str = "lastContext.json";

/// Read a context previously written by [`save`].
pub fn load(path: &Path) -> CliResult<Context> {
    let raw = fs::read_to_string(path)
        .with_cli_context(|| format!("reading context file {}", path.display()))?;
    let context: Context = serde_json::from_str(&raw)
        .with_cli_context(|| format!("invalid context file {}", path.display()))?;
    debug!(path = %path.display(), parameters = context.len(), "context loaded");
    Ok(context)
}

/// Write `context` into `dir` and return the file path.
pub fn save(dir: &Path, context: &Context) -> CliResult<PathBuf> {
    fs::create_dir_all(dir)
        .with_cli_context(|| format!("creating context folder {}", dir.display()))?;
    let path = dir.join(file_name(context));
    let json = serde_json::to_string_pretty(context)
        .with_cli_context(|| "serializing context".to_string())?;
    fs::write(&path, json).with_cli_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "context saved");
    Ok(path)
}

/// `<name>-(<template>).json`, `<name>.json` or [`FALLBACK_FILE`].
pub fn file_name(context: &Context) -> String {
    let name = context.string("name").ok().flatten().filter(|n| !n.is_empty());
    let template = context
        .string("template")
        .ok()
        .flatten()
        .filter(|t| !t.is_empty())
        .map(TemplateName::new);

    match (name, template) {
        (Some(name), Some(template)) => format!("{name}-({}).json", template.file_safe()),
        (Some(name), None) => format!("{name}.json"),
        _ => FALLBACK_FILE.to_string(),
    }
}
