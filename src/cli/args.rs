//! CLI argument definitions
//!
//! All Clap derive structs for `nixos-options` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;
use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Expand `::nixos-options::<module>::` markers in Markdown into NixOS option docs.
#[derive(Parser, Debug)]
#[command(name = "nixos-options", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "NIXOS_OPTIONS_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(
        long,
        default_value = "human",
        global = true,
        env = "NIXOS_OPTIONS_LOG_FORMAT"
    )]
    pub log_format: OutputFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand option markers in Markdown files or stdin.
    Expand(ExpandArgs),

    /// Evaluate a module and print its option records.
    Eval(EvalArgs),

    /// Print the Nix expression used to evaluate a module.
    Expression(ExpressionArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Plugin Options
// ============================================================================

/// Plugin options shared by every command that evaluates modules.
///
/// Flags win over environment variables, which win over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct PluginArgs {
    /// YAML config file (bare options mapping or an mkdocs.yml).
    #[arg(short, long, env = "NIXOS_OPTIONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable or disable marker expansion.
    #[arg(long, env = "NIXOS_OPTIONS_ENABLE")]
    pub enable: Option<bool>,

    /// Evaluator executable.
    #[arg(long, visible_alias = "nix-bin", env = "NIXOS_OPTIONS_EVALUATOR_BIN")]
    pub evaluator_bin: Option<String>,

    /// Extra argument appended to the `nix eval` command line.
    #[arg(
        long,
        visible_alias = "nix-extra-args",
        env = "NIXOS_OPTIONS_EVALUATOR_EXTRA_ARGS",
        allow_hyphen_values = true
    )]
    pub evaluator_extra_args: Option<String>,

    /// Template file, or `default` for the built-in template.
    #[arg(short, long, env = "NIXOS_OPTIONS_TEMPLATE")]
    pub template: Option<String>,
}

impl PluginArgs {
    /// Values given on the command line or in the environment.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            enable: self.enable,
            evaluator_bin: self.evaluator_bin.clone(),
            evaluator_extra_args: self.evaluator_extra_args.clone(),
            template: self.template.clone(),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Arguments for `expand`.
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Markdown files to expand. Reads stdin when empty or `-`.
    pub files: Vec<PathBuf>,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Rewrite each input file with its expanded contents.
    #[arg(short, long)]
    pub in_place: bool,

    #[command(flatten)]
    pub plugin: PluginArgs,
}

/// Arguments for `eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Module path, as it would appear inside a marker.
    pub module_path: String,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub plugin: PluginArgs,
}

/// Arguments for `expression`.
#[derive(Args, Debug)]
pub struct ExpressionArgs {
    /// Module path, as it would appear inside a marker.
    pub module_path: String,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl From<OutputFormat> for LogFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => Self::Human,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
