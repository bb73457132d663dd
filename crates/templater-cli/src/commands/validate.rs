//! `templater validate`: generate templates with their validation context.

use tracing::instrument;

use templater_core::{
    application::{ValidationOutcome, Validator},
    domain::TemplateName,
};

use crate::{
    cli::{GlobalArgs, ValidateArgs},
    commands::Session,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: ValidateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let session = Session::new(&global, config);
    let base = session.seed_context(&args.parameters)?;
    let only = args.template.as_deref().map(TemplateName::new);

    let generator = session.generator();
    let validator = Validator::new(&generator, session.config.paths.validate());

    let spinner = output.spinner("Validating templates");
    let result = validator.validate(only.as_ref(), &base);
    spinner.finish_and_clear();
    let report = result?;

    for result in &report.results {
        match &result.outcome {
            ValidationOutcome::Passed { files } => {
                output.success(&format!("{result} ({files} file(s))"))?
            }
            ValidationOutcome::Failed { message } => {
                output.error(&format!("{result}: {message}"))?
            }
        }
    }

    if report.is_success() {
        output.info(&format!("{} validation run(s) passed", report.passed()))?;
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            failed: report.failed(),
            total: report.results.len(),
        })
    }
}
