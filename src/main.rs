//! `nixos-options` - expand NixOS option markers in Markdown

use clap::Parser;

use nixos_options::cli::args::Cli;
use nixos_options::cli::commands;
use nixos_options::error::ExitCode;
use nixos_options::observability::{LogSettings, init_logging};

fn main() {
    let cli = Cli::parse();

    init_logging(LogSettings {
        format: cli.log_format.into(),
        verbosity: cli.verbose,
        quiet: cli.quiet,
        color: cli.color,
    });

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
