//! Plugin configuration schema.

use serde::Deserialize;

/// Template name that selects the built-in option template.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Option names accepted in a configuration file, in documentation order.
///
/// `nix_bin` and `nix_command_extra_args` are the mkdocs plugin's spellings
/// of `evaluator_bin` and `evaluator_extra_args`.
pub const KNOWN_KEYS: [&str; 6] = [
    "enable",
    "evaluator_bin",
    "evaluator_extra_args",
    "template",
    "nix_bin",
    "nix_command_extra_args",
];

/// Immutable plugin configuration.
///
/// Built once (file, then environment and CLI overrides) and shared by the
/// expander for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Master switch. When `false`, text passes through untouched.
    pub enable: bool,

    /// Evaluator executable name or path.
    #[serde(alias = "nix_bin")]
    pub evaluator_bin: String,

    /// Appended verbatim to the evaluator command line as a single argument.
    #[serde(alias = "nix_command_extra_args")]
    pub evaluator_extra_args: String,

    /// `"default"` for the built-in template, otherwise a template file path.
    pub template: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            enable: true,
            evaluator_bin: "nix".to_string(),
            evaluator_extra_args: String::new(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

/// Values that take precedence over the configuration file.
///
/// Every `None` leaves the underlying value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Overrides `enable`.
    pub enable: Option<bool>,
    /// Overrides `evaluator_bin`.
    pub evaluator_bin: Option<String>,
    /// Overrides `evaluator_extra_args`.
    pub evaluator_extra_args: Option<String>,
    /// Overrides `template`.
    pub template: Option<String>,
}

impl PluginConfig {
    /// Applies overrides, returning the merged configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(enable) = overrides.enable {
            self.enable = enable;
        }
        if let Some(bin) = overrides.evaluator_bin {
            self.evaluator_bin = bin;
        }
        if let Some(extra) = overrides.evaluator_extra_args {
            self.evaluator_extra_args = extra;
        }
        if let Some(template) = overrides.template {
            self.template = template;
        }
        self
    }
}
