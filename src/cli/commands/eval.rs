//! `eval` command handler.
//!
//! Runs the evaluator for one module path and prints what it reports,
//! which is handy when writing a custom template.

use crate::cli::args::{EvalArgs, OutputFormat};
use crate::cli::commands::resolve_config;
use crate::error::NixOptionsError;
use crate::evaluator::{ModuleEvaluator, NixEvaluator};
use crate::options::EvaluatorResponse;

/// Execute `eval`.
///
/// # Errors
///
/// Returns configuration, evaluator or JSON serialization errors.
pub fn run(args: &EvalArgs) -> Result<(), NixOptionsError> {
    let config = resolve_config(&args.plugin)?;
    let response = NixEvaluator::from_config(&config).evaluate(&args.module_path)?;
    println!("{}", format_response(&response, args.format)?);
    Ok(())
}

/// Formats a response: pretty JSON, or one `key<TAB>type` line per option.
fn format_response(
    response: &EvaluatorResponse,
    format: OutputFormat,
) -> Result<String, NixOptionsError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(response)?),
        OutputFormat::Human => Ok(response
            .iter()
            .map(|(key, record)| format!("{key}\t{}", record.kind.as_deref().unwrap_or("")))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
