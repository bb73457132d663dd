//! `templater generate`: render a template chain into the staging area.
//!
//! 1. Seed the context from `--context` and `-D` overrides
//! 2. Resolve dependencies and missing parameters, then render
//! 3. Report where every staged file belongs
//! 4. Optionally copy the files into the project (`--apply`)
//! 5. Save the final context for the next run

use tracing::{info, instrument};

use templater_core::{
    application::{ApplyTarget, GenerateOptions, apply_manifest},
    domain::TemplateName,
};

use crate::{
    cli::{GenerateArgs, GlobalArgs},
    commands::Session,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.template))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let session = Session::new(&global, config);
    let template = TemplateName::new(args.template.as_str());
    let mut context = session.seed_context(&args.parameters)?;

    let staging = session.config.paths.generate();
    let mut options = GenerateOptions::new(staging.clone());
    if args.keep_staging {
        options = options.keep_staging();
    }

    let spinner = output.spinner(&format!("Generating {template}"));
    let result = session.generator().generate(&template, &mut context, &options);
    spinner.finish_and_clear();
    let generation = result?;

    output.success(&format!(
        "Generated {} file(s) from {} into {}",
        generation.manifest.len(),
        generation
            .templates
            .iter()
            .map(TemplateName::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        staging.display()
    ))?;
    for entry in &generation.manifest {
        let target = entry
            .project_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(staging only)".into());
        output.print(&format!("  {} -> {}", entry.staged_path.display(), target))?;
    }

    if args.apply {
        let copied = apply_manifest(&*session.fs, &generation.manifest, ApplyTarget::Project)?;
        output.success(&format!(
            "Copied {copied} file(s) into {}",
            generation.paths.project.display()
        ))?;
    }

    let saved = session.save_context(&context)?;
    output.info(&format!("Context saved to {}", saved.display()))?;

    info!(files = generation.manifest.len(), "generate finished");
    Ok(())
}
