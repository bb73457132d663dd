//! `templater config`: print the effective configuration or its default path.

use crate::{
    cli::ConfigArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: ConfigArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.path {
        output.data(&AppConfig::config_path().display().to_string())?;
        return Ok(());
    }

    let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    output.data(&serialised)?;
    Ok(())
}
