//! User-facing output on stdout.
//!
//! Status lines carry a one-character marker so they stay readable without
//! colour. Only errors and machine-readable payloads survive `--quiet`.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{AnsiColors, OwoColorize};

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy)]
enum Status {
    Success,
    Error,
    Warning,
    Info,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Error => "\u{2717}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }

    fn color(self) -> AnsiColors {
        match self {
            Self::Success => AnsiColors::Green,
            Self::Error => AnsiColors::Red,
            Self::Warning => AnsiColors::Yellow,
            Self::Info => AnsiColors::Blue,
        }
    }
}

pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Colour is off when asked for by flag or config, and when stdout is piped.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color || !io::stdout().is_terminal(),
            term: Term::stdout(),
        }
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Machine-readable payload (JSON, name lists); never suppressed.
    pub fn data(&self, payload: &str) -> io::Result<()> {
        self.term.write_line(payload)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Success, msg)
    }

    pub fn error(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Error, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.status(Status::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        if self.no_color {
            self.term.write_line(text)
        } else {
            self.term.write_line(&text.cyan().bold().to_string())
        }
    }

    /// Spinner on stderr while the engine works; hidden when quiet or piped.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg.to_owned());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    fn status(&self, status: Status, msg: &str) -> io::Result<()> {
        if self.quiet && !matches!(status, Status::Error) {
            return Ok(());
        }
        self.term.write_line(&self.status_line(status, msg))
    }

    fn status_line(&self, status: Status, msg: &str) -> String {
        if self.no_color {
            return format!("{} {msg}", status.marker());
        }
        let color = status.color();
        format!("{} {}", status.marker().color(color).bold(), msg.color(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(quiet: bool, no_color: bool) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            non_interactive: true,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn plain_status_lines_keep_their_marker() {
        let out = manager(false, true);
        assert_eq!(out.status_line(Status::Success, "Generated"), "\u{2713} Generated");
        assert_eq!(out.status_line(Status::Warning, "No definition found for X"), "\u{26a0} No definition found for X");
    }

    #[test]
    fn quiet_mode_still_writes_errors() {
        let out = manager(true, true);
        assert!(out.print("hidden").is_ok());
        assert!(out.error("something went wrong").is_ok());
    }

    #[test]
    fn config_can_disable_color() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            non_interactive: true,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(OutputManager::new(&args, &config).no_color);
    }

    #[test]
    fn quiet_spinner_is_hidden() {
        assert!(manager(true, true).spinner("Generating").is_hidden());
    }
}
