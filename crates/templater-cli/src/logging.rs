//! Tracing subscriber setup for the `templater` binary.
//!
//! The engine crates only emit events; this module decides what reaches
//! stderr. `-v` raises the level one step per flag starting from WARN,
//! `--quiet` drops it to ERROR, and `RUST_LOG` replaces the whole filter.
//! From `-vv` on, event targets are shown and closed spans report their
//! timing, which is how slow template trees are spotted.

use std::io::IsTerminal as _;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

/// Crates whose events follow the selected level; everything else stays at WARN.
const CRATES: [&str; 3] = ["templater", "templater_core", "templater_adapters"];

pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = derive_level(args);
    let detailed = level >= LevelFilter::DEBUG;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(detailed)
        .with_span_events(if detailed { FmtSpan::CLOSE } else { FmtSpan::NONE })
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}

fn derive_level(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn filter_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_ascii_lowercase();
    std::iter::once("warn".to_owned())
        .chain(CRATES.iter().map(|krate| format!("{krate}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}
