//! Logging setup for the `nixos-options` binary.
//!
//! Events go to stderr so expanded Markdown written to stdout stays clean.
//! `NIXOS_OPTIONS_LOG_LEVEL` takes any `EnvFilter` directive and wins over
//! `-v`/`-q`.

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::args::ColorChoice;

/// Environment variable holding a filter directive, e.g. `nixos_options=debug`.
pub const LOG_LEVEL_ENV: &str = "NIXOS_OPTIONS_LOG_LEVEL";

/// How log events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain text lines, colored when allowed.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Logging options collected from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogSettings {
    /// Output format.
    pub format: LogFormat,
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// `--quiet`: only errors are reported.
    pub quiet: bool,
    /// ANSI color handling for the human format.
    pub color: ColorChoice,
}

impl LogSettings {
    /// Level used when `NIXOS_OPTIONS_LOG_LEVEL` is unset.
    ///
    /// Warnings (e.g. stderr from a successful `nix eval`) are shown by
    /// default; `--quiet` keeps only errors.
    #[must_use]
    pub const fn level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Builds the filter, preferring a valid `directive` from the environment.
    fn filter(&self, directive: Option<&str>) -> EnvFilter {
        directive
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level()))
    }

    /// Whether human output should carry ANSI escapes.
    fn ansi(&self, stderr_is_terminal: bool, no_color: bool) -> bool {
        match self.color {
            ColorChoice::Auto => stderr_is_terminal && !no_color,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Installs the global subscriber.
///
/// A second call leaves the first subscriber in place.
pub fn init_logging(settings: LogSettings) {
    let directive = std::env::var(LOG_LEVEL_ENV).ok();
    let filter = settings.filter(directive.as_deref());
    // Module targets only help when chasing evaluator or template issues.
    let show_target = settings.verbosity >= 2;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match settings.format {
        LogFormat::Human => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_target)
            .with_ansi(settings.ansi(
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            ))
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(show_target)
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();
}
