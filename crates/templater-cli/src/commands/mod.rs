//! Command handlers, one module per subcommand.
//!
//! Every handler receives already-parsed arguments, the loaded
//! [`AppConfig`] and an [`OutputManager`]; it builds the engine through
//! [`Session`] and reports through the output manager.

pub mod completions;
pub mod config;
pub mod generate;
pub mod list;
pub mod prepare;
pub mod validate;

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use templater_adapters::{DefaultsResolver, FilesystemTemplateStore, LocalFilesystem, TeraRenderer};
use templater_core::{
    application::{
        DependencyAnalyzer, Generator, ParameterService, Preparator, TemplateRegistry,
        ports::{Filesystem, ParameterResolver, TextRenderer},
    },
    domain::{Context, DomainError, ParameterDescriptor, ParameterSet},
};

use crate::{
    cli::{GlobalArgs, ParameterArgs},
    config::AppConfig,
    context_store,
    error::{CliResult, IntoCli},
};

/// Wired engine for one invocation.
pub struct Session {
    pub config: AppConfig,
    pub registry: Arc<TemplateRegistry>,
    pub fs: Arc<dyn Filesystem>,
    renderer: Arc<dyn TextRenderer>,
    resolver: Arc<dyn ParameterResolver>,
}

impl Session {
    pub fn new(global: &GlobalArgs, config: AppConfig) -> Self {
        let store = FilesystemTemplateStore::new(config.paths.templates());
        let interactive = !global.non_interactive
            && !global.quiet
            && config.generation.interactive
            && std::io::stdin().is_terminal();
        debug!(templates = %config.paths.templates().display(), interactive, "session configured");

        Self {
            registry: Arc::new(TemplateRegistry::new(Box::new(store))),
            fs: Arc::new(LocalFilesystem::new()),
            renderer: Arc::new(TeraRenderer::new()),
            resolver: resolver(interactive),
            config,
        }
    }

    pub fn generator(&self) -> Generator {
        Generator::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.fs),
            Arc::clone(&self.renderer),
            ParameterService::new(Arc::clone(&self.resolver)),
        )
        .with_template_extension(self.config.generation.template_extension.clone())
    }

    pub fn preparator(&self) -> Preparator {
        let analyzer = DependencyAnalyzer::new(
            Arc::clone(&self.fs),
            self.config.analysis.source_extensions.clone(),
        );
        Preparator::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.fs),
            analyzer,
            ParameterService::new(Arc::clone(&self.resolver)),
        )
        .with_template_extension(self.config.generation.template_extension.clone())
    }

    /// Starting context: the `--context` file, then every `-D` override
    /// coerced to its declared kind, with `projectPath` made absolute.
    pub fn seed_context(&self, args: &ParameterArgs) -> CliResult<Context> {
        let mut context = match &args.context {
            Some(path) => context_store::load(path)?,
            None => Context::new(),
        };

        for (name, raw) in &args.defines {
            let value = self.descriptor_for(name)?.coerce(raw)?;
            context.set(name.as_str(), value)?;
        }

        let project = context.string("projectPath")?.unwrap_or(".").to_owned();
        let project = absolute(Path::new(&project))?;
        context.set("projectPath", project.to_string_lossy().into_owned())?;
        Ok(context)
    }

    /// Persist the final context of a run and return where it went.
    pub fn save_context(&self, context: &Context) -> CliResult<PathBuf> {
        context_store::save(&self.config.paths.contexts(), context)
    }

    /// Built-in parameters first, then the first template declaring `name`.
    fn descriptor_for(&self, name: &str) -> CliResult<ParameterDescriptor> {
        if let Some(builtin) = ParameterSet::builtin().get(name) {
            return Ok(builtin.clone());
        }
        for template in self.registry.discover()? {
            if let Some(declared) = template.parameters().iter().find(|d| d.name == name) {
                return Ok(declared.clone());
            }
        }
        Err(DomainError::ParameterUnknown {
            name: name.to_owned(),
        }
        .into())
    }
}

pub fn absolute(path: &Path) -> CliResult<PathBuf> {
    std::path::absolute(path).with_cli_context(|| format!("resolving {}", path.display()))
}

#[cfg(feature = "interactive")]
fn resolver(interactive: bool) -> Arc<dyn ParameterResolver> {
    if interactive {
        Arc::new(crate::prompt::PromptResolver::new())
    } else {
        Arc::new(DefaultsResolver::new())
    }
}

#[cfg(not(feature = "interactive"))]
fn resolver(_interactive: bool) -> Arc<dyn ParameterResolver> {
    Arc::new(DefaultsResolver::new())
}
