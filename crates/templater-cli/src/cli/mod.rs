//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "templater",
    bin_name = "templater",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate source trees from templates, or extract templates from source trees",
    long_about = "Templater renders folder-shaped templates into a staging area, mapping each \
                  file onto its place in the project, and prepares new templates from \
                  existing project files.",
    after_help = "EXAMPLES:\n\
        \x20 templater generate -t Feature/Screen -D name=Login -D projectName=Shop\n\
        \x20 templater prepare  -t Feature/Cart --name Cart --file Sources/CartView.swift\n\
        \x20 templater validate\n\
        \x20 templater list --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a template and its dependencies into the staging area.
    #[command(
        visible_alias = "g",
        about = "Generate files from a template",
        after_help = "EXAMPLES:\n\
            \x20 templater generate -t Feature/Screen -D name=Login\n\
            \x20 templater generate -t App -D useRx=yes --apply\n\
            \x20 templater generate -t Feature/Screen --context Contexts/Login.json"
    )]
    Generate(GenerateArgs),

    /// Turn project files into a new template.
    #[command(
        visible_alias = "p",
        about = "Prepare a template from project files",
        after_help = "EXAMPLES:\n\
            \x20 templater prepare -t Feature/Cart --name Cart --file Sources/CartView.swift\n\
            \x20 templater prepare -t Feature/Cart --name Cart --file a.swift --file b.swift \\\n\
            \x20     --derive-from Feature/Screen --apply"
    )]
    Prepare(PrepareArgs),

    /// Generate templates with their validation context.
    #[command(
        about = "Validate templates",
        after_help = "EXAMPLES:\n\
            \x20 templater validate\n\
            \x20 templater validate -t Feature/Screen"
    )]
    Validate(ValidateArgs),

    /// List available templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 templater list\n\
            \x20 templater list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 templater completions bash > ~/.local/share/bash-completion/completions/templater\n\
            \x20 templater completions zsh  > ~/.zfunc/_templater\n\
            \x20 templater completions fish > ~/.config/fish/completions/templater.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Show configuration",
        after_help = "EXAMPLES:\n\
            \x20 templater config\n\
            \x20 templater config --path"
    )]
    Config(ConfigArgs),
}

// ── parameters ────────────────────────────────────────────────────────────────

/// Parameter overrides shared by every rendering command.
#[derive(Debug, Args)]
pub struct ParameterArgs {
    /// Set a parameter, e.g. `-D name=Login` or `-D targets=iOS,macOS`.
    #[arg(
        short = 'D',
        long = "define",
        value_name = "KEY=VALUE",
        value_parser = parse_define,
        help = "Set a template parameter (repeatable)"
    )]
    pub defines: Vec<(String, String)>,

    /// Seed the run from a previously saved context.
    #[arg(long = "context", value_name = "FILE", help = "Load parameters from a context file")]
    pub context: Option<PathBuf>,
}

fn parse_define(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `templater generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Template to render, relative to the template root.
    #[arg(short = 't', long = "template", value_name = "TEMPLATE")]
    pub template: String,

    #[command(flatten)]
    pub parameters: ParameterArgs,

    /// Layer onto the existing staging content instead of clearing it.
    #[arg(long = "keep-staging", help = "Do not clear the staging area first")]
    pub keep_staging: bool,

    /// Copy the staged files into the project afterwards.
    #[arg(long = "apply", help = "Copy generated files to their project location")]
    pub apply: bool,
}

// ── prepare ───────────────────────────────────────────────────────────────────

/// Arguments for `templater prepare`.
#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Name of the template to create.
    #[arg(short = 't', long = "template", value_name = "TEMPLATE")]
    pub template: String,

    /// Item name the files are built around; it becomes `{{name}}`.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: String,

    /// Project file to extract (repeatable).
    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        required = true,
        num_args = 1..
    )]
    pub files: Vec<PathBuf>,

    /// Copy the descriptor of an existing template.
    #[arg(long = "derive-from", value_name = "TEMPLATE")]
    pub derive_from: Option<String>,

    #[command(flatten)]
    pub parameters: ParameterArgs,

    /// Copy the prepared template into the template root afterwards.
    #[arg(long = "apply", help = "Install the prepared template")]
    pub apply: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `templater validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Validate only this template.
    #[arg(short = 't', long = "template", value_name = "TEMPLATE")]
    pub template: Option<String>,

    #[command(flatten)]
    pub parameters: ParameterArgs,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `templater list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `templater completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Arguments for `templater config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print the default configuration file location instead.
    #[arg(long = "path", help = "Print the default configuration file path")]
    pub path: bool,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_generate_with_defines() {
        let cli = Cli::parse_from([
            "templater",
            "generate",
            "-t",
            "Feature/Screen",
            "-D",
            "name=Login",
            "-D",
            "targets=iOS,macOS",
            "--apply",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.template, "Feature/Screen");
        assert_eq!(
            args.parameters.defines,
            vec![
                ("name".to_string(), "Login".to_string()),
                ("targets".to_string(), "iOS,macOS".to_string()),
            ]
        );
        assert!(args.apply);
        assert!(!args.keep_staging);
    }

    #[test]
    fn define_value_may_contain_equals() {
        assert_eq!(
            parse_define("copyright=a=b").unwrap(),
            ("copyright".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn define_without_equals_is_rejected() {
        assert!(parse_define("name").is_err());
        assert!(parse_define("=Login").is_err());
    }

    #[test]
    fn prepare_requires_a_file() {
        let result = Cli::try_parse_from(["templater", "prepare", "-t", "T", "--name", "Cart"]);
        assert!(result.is_err());
    }

    #[test]
    fn prepare_accepts_several_files() {
        let cli = Cli::parse_from([
            "templater", "prepare", "-t", "T", "-n", "Cart", "-f", "a.swift", "-f", "b.swift",
        ]);
        let Commands::Prepare(args) = cli.command else {
            panic!("expected Prepare command");
        };
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["templater", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
