//! `nixos-options` - NixOS module option docs for Markdown
//!
//! Expands `::nixos-options::<module_path>::` markers in Markdown pages into
//! rendered option documentation. Each module path is evaluated with
//! `nix eval`, and every option it declares is rendered through a Jinja
//! template (a built-in heading-plus-table layout, or a user template file).
//!
//! ```no_run
//! use nixos_options::{Expander, PluginConfig};
//!
//! let expander = Expander::new(PluginConfig::default());
//! let page = expander.expand("# Options\n\n::nixos-options::./module.nix::\n")?;
//! print!("{page}");
//! # Ok::<(), nixos_options::NixOptionsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod expander;
pub mod observability;
pub mod options;
pub mod template;

pub use config::PluginConfig;
pub use error::NixOptionsError;
pub use evaluator::{ModuleEvaluator, NixEvaluator};
pub use expander::{Expander, expand};
pub use options::{DefaultValue, EvaluatorResponse, OptionFields, OptionRecord};
pub use template::TemplateRenderer;
