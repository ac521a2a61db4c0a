//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod eval;
pub mod expand;
pub mod expression;
pub mod version;

use tracing::debug;

use crate::cli::args::{Cli, Commands, PluginArgs};
use crate::config::{PluginConfig, load_config};
use crate::error::NixOptionsError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), NixOptionsError> {
    match cli.command {
        Commands::Expand(args) => expand::run(&args),
        Commands::Eval(args) => eval::run(&args),
        Commands::Expression(args) => {
            expression::run(&args);
            Ok(())
        }
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Builds the effective plugin configuration: config file (if any), then
/// environment and command-line overrides.
///
/// # Errors
///
/// Returns a configuration error if the config file is missing or invalid.
pub fn resolve_config(args: &PluginArgs) -> Result<PluginConfig, NixOptionsError> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => PluginConfig::default(),
    };
    let config = base.with_overrides(args.overrides());
    debug!(?config, "resolved plugin configuration");
    Ok(config)
}
