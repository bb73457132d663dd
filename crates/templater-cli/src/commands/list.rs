//! Implementation of the `templater list` command.

use serde::Serialize;

use templater_core::domain::{TemplateInfo, TemplateStatus};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    commands::Session,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// One row of the listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateSummary<'a> {
    name: &'a str,
    status: TemplateStatus,
    description: &'a str,
    dependencies: &'a [String],
}

impl<'a> From<&'a TemplateInfo> for TemplateSummary<'a> {
    fn from(info: &'a TemplateInfo) -> Self {
        Self {
            name: info.name.as_str(),
            status: info.descriptor.status,
            description: &info.descriptor.description,
            dependencies: &info.descriptor.dependencies,
        }
    }
}

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let session = Session::new(&global, config);
    let templates = session.registry.discover()?;
    let summaries: Vec<TemplateSummary<'_>> =
        templates.iter().map(|t| TemplateSummary::from(*t)).collect();

    match args.format {
        ListFormat::Table => {
            if summaries.is_empty() {
                output.warning(&format!(
                    "No templates under {}",
                    session.registry.root().display()
                ))?;
                return Ok(());
            }
            output.header("Available Templates:")?;
            let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
            for s in &summaries {
                output.print(&format!(
                    "  {:<width$}  {:<8}  {} dep(s)  {}",
                    s.name,
                    s.status.to_string(),
                    s.dependencies.len(),
                    s.description
                ))?;
            }
        }

        // JSON and bare names must stay parseable, so they bypass quiet mode.
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&summaries)
                .with_cli_context(|| "serializing template list")?;
            output.data(&json)?;
        }

        ListFormat::List => {
            for s in &summaries {
                output.data(s.name)?;
            }
        }
    }

    Ok(())
}
