//! `completions` command handler.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell as ClapShell;

use crate::cli::args::{Cli, CompletionsArgs, Shell};

impl From<Shell> for ClapShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

/// Print the completion script for the requested shell to stdout.
pub fn run(args: &CompletionsArgs) {
    write_script(args.shell, &mut std::io::stdout().lock());
}

fn write_script(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(ClapShell::from(shell), &mut cmd, bin, out);
}
