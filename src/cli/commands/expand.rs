//! `expand` command handler.
//!
//! Reads Markdown from files or stdin, expands option markers, and writes
//! the result to stdout, an output file, or back to each input.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::args::ExpandArgs;
use crate::cli::commands::resolve_config;
use crate::error::NixOptionsError;
use crate::expander::Expander;

/// Execute `expand`.
///
/// # Errors
///
/// Returns a usage error for invalid flag combinations, and propagates
/// configuration, I/O, evaluator and template errors.
pub fn run(args: &ExpandArgs) -> Result<(), NixOptionsError> {
    let inputs = inputs(&args.files);
    check_args(args, &inputs)?;

    let config = resolve_config(&args.plugin)?;
    let expander = Expander::new(config);

    for input in &inputs {
        if is_stdin(input) {
            let text = io::read_to_string(io::stdin())?;
            let expanded = expander.expand(&text)?;
            write_output(args.output.as_deref(), &expanded)?;
            continue;
        }

        info!(path = %input.display(), "expanding");
        let text = fs::read_to_string(input).map_err(|e| with_path(e, input))?;
        let expanded = expander.expand(&text)?;

        if args.in_place {
            if expanded == text {
                debug!(path = %input.display(), "no markers expanded, leaving file untouched");
            } else {
                fs::write(input, &expanded).map_err(|e| with_path(e, input))?;
                info!(path = %input.display(), "updated");
            }
        } else {
            write_output(args.output.as_deref(), &expanded)?;
        }
    }

    Ok(())
}

fn inputs(files: &[PathBuf]) -> Vec<PathBuf> {
    if files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        files.to_vec()
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn check_args(args: &ExpandArgs, inputs: &[PathBuf]) -> Result<(), NixOptionsError> {
    if args.in_place && inputs.iter().any(|p| is_stdin(p)) {
        return Err(NixOptionsError::Usage(
            "--in-place needs file arguments, not stdin".to_string(),
        ));
    }
    if args.output.is_some() && inputs.len() > 1 {
        return Err(NixOptionsError::Usage(
            "--output takes exactly one input".to_string(),
        ));
    }
    if inputs.iter().filter(|p| is_stdin(p)).count() > 1 {
        return Err(NixOptionsError::Usage(
            "stdin ('-') can only be read once".to_string(),
        ));
    }
    Ok(())
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), NixOptionsError> {
    match output {
        Some(path) => fs::write(path, text).map_err(|e| with_path(e, path))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn with_path(err: io::Error, path: &Path) -> io::Error {
    io::Error::new(err.kind(), format!("{}: {err}", path.display()))
}
