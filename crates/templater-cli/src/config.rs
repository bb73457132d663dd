//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables prefixed `TEMPLATER__`, nested with `__`
//!    (`TEMPLATER__PATHS__TEMPLATES=/srv/templates`)
//! 3. Config file: `--config`, else `./templater.toml`, else the platform
//!    config dir
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "templater.toml";

const ENV_PREFIX: &str = "TEMPLATER";
const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Working folders.
    pub paths: PathsConfig,
    /// Generation behaviour.
    pub generation: GenerationConfig,
    /// Dependency analysis during prepare.
    pub analysis: AnalysisConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Working folders; relative entries resolve against `script_root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub script_root: PathBuf,
    pub templates: PathBuf,
    pub generate: PathBuf,
    pub prepare: PathBuf,
    pub validate: PathBuf,
    pub contexts: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Prompt for missing parameters when attached to a terminal.
    pub interactive: bool,
    /// Extension stripped from template files, without the dot.
    pub template_extension: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Extensions of files searched for type definitions.
    pub source_extensions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            script_root: PathBuf::from("templater"),
            templates: PathBuf::from("Templates"),
            generate: PathBuf::from("Generate"),
            prepare: PathBuf::from("Prepare"),
            validate: PathBuf::from("Validate"),
            contexts: PathBuf::from("Contexts"),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            template_extension: "tera".into(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source_extensions: vec!["swift".into()],
        }
    }
}

impl PathsConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.script_root.join(path)
        }
    }

    pub fn templates(&self) -> PathBuf {
        self.resolve(&self.templates)
    }

    pub fn generate(&self) -> PathBuf {
        self.resolve(&self.generate)
    }

    pub fn prepare(&self) -> PathBuf {
        self.resolve(&self.prepare)
    }

    pub fn validate(&self) -> PathBuf {
        self.resolve(&self.validate)
    }

    pub fn contexts(&self) -> PathBuf {
        self.resolve(&self.contexts)
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        builder = match config_file {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None if Path::new(LOCAL_CONFIG_FILE).is_file() => {
                builder.add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).required(true))
            }
            None => builder.add_source(File::from(Self::config_path()).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("analysis.source_extensions"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `templater.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "templater", "templater")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}
