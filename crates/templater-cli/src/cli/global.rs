//! Flags shared by every `templater` subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more: -v templates and files, -vv traversal and dependency
    /// resolution with span timings, -vvv every rendered text
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors and machine-readable output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain output without ANSI colours (also set by NO_COLOR)
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from FILE instead of ./templater.toml or the user config
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Never prompt; parameters without a value or default are an error
    #[arg(long, global = true)]
    pub non_interactive: bool,
}
