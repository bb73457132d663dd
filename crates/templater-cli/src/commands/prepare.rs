//! `templater prepare`: turn project files into a new template.

use tracing::{info, instrument};

use templater_core::{
    application::{ApplyTarget, PrepareReport, PrepareRequest, apply_manifest},
    domain::TemplateName,
};

use crate::{
    cli::{GlobalArgs, PrepareArgs},
    commands::{Session, absolute},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.template))]
pub fn execute(
    args: PrepareArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let session = Session::new(&global, config);
    let mut context = session.seed_context(&args.parameters)?;
    context.set("name", args.name.as_str())?;

    let request = PrepareRequest {
        template: TemplateName::new(args.template.as_str()),
        files: args
            .files
            .iter()
            .map(|f| absolute(f))
            .collect::<CliResult<Vec<_>>>()?,
        derive_from: args.derive_from.as_deref().map(TemplateName::new),
        prepare_root: session.config.paths.prepare(),
    };

    let spinner = output.spinner(&format!("Preparing {}", request.template));
    let result = session.preparator().prepare(&request, &mut context);
    spinner.finish_and_clear();
    let report = result?;

    output.success(&format!(
        "Prepared {} with {} file(s) in {}",
        request.template,
        report.manifest.len(),
        request.prepare_root.display()
    ))?;
    for entry in &report.manifest {
        output.print(&format!(
            "  {} -> {}",
            entry.staged_path.display(),
            entry.template_path.display()
        ))?;
    }
    print_dependencies(&output, &report)?;

    if args.apply {
        let copied = apply_manifest(&*session.fs, &report.manifest, ApplyTarget::Template)?;
        output.success(&format!(
            "Installed {copied} file(s) into {}",
            session.registry.root().join(request.template.as_str()).display()
        ))?;
    }

    let saved = session.save_context(&context)?;
    output.info(&format!("Context saved to {}", saved.display()))?;

    info!(files = report.manifest.len(), "prepare finished");
    Ok(())
}

fn print_dependencies(output: &OutputManager, report: &PrepareReport) -> std::io::Result<()> {
    if !report.dependencies.frameworks.is_empty() {
        output.header("Frameworks:")?;
        for framework in &report.dependencies.frameworks {
            output.print(&format!("  {framework}"))?;
        }
    }
    if !report.definitions.located.is_empty() {
        output.header("Referenced types:")?;
        for (name, file) in &report.definitions.located {
            output.print(&format!("  {name}  {}", file.display()))?;
        }
    }
    for name in &report.definitions.unresolved {
        output.warning(&format!("No definition found for {name}"))?;
    }
    Ok(())
}
