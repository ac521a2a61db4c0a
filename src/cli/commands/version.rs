//! `version` command handler.

use crate::cli::args::{OutputFormat, VersionArgs};

/// Package name and version, as printed by `version`.
fn version_line(format: OutputFormat) -> String {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    match format {
        OutputFormat::Human => format!("{name} {version}"),
        OutputFormat::Json => serde_json::json!({ "name": name, "version": version }).to_string(),
    }
}

/// Print version information.
pub fn run(args: &VersionArgs) {
    println!("{}", version_line(args.format));
}
