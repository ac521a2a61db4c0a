//! Configuration loader
//!
//! Reads plugin options from a YAML file. Two document shapes are accepted:
//!
//! 1. A bare mapping of plugin options:
//!    ```yaml
//!    evaluator_bin: nix
//!    template: docs/option.md.j2
//!    ```
//! 2. An mkdocs-style site config, where the options sit under the
//!    `nixos-options` entry of the `plugins:` list:
//!    ```yaml
//!    plugins:
//!      - search
//!      - nixos-options:
//!          template: docs/option.md.j2
//!    ```

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::config::schema::{KNOWN_KEYS, PluginConfig};
use crate::error::ConfigError;

/// Name of the plugin entry inside an mkdocs `plugins:` list.
pub const PLUGIN_NAME: &str = "nixos-options";

/// Loads plugin configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError::MissingFile` if `path` does not exist, and
/// `ConfigError::ParseError`, `ConfigError::UnknownKey` or
/// `ConfigError::InvalidValue` if the contents are not a valid configuration.
pub fn load_config(path: &Path) -> Result<PluginConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: e.to_string(),
            }
        }
    })?;

    debug!(path = %path.display(), "loading plugin configuration");
    parse_config(&content, path)
}

/// Parses plugin configuration from YAML text.
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(content: &str, path: &Path) -> Result<PluginConfig, ConfigError> {
    let root: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;

    let options = match root {
        Value::Null => return Ok(PluginConfig::default()),
        Value::Mapping(map) => match map.get("plugins").cloned() {
            Some(plugins) => plugin_entry(plugins, path)?,
            None => map,
        },
        other => {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("expected a mapping, found {}", value_kind(&other)),
            });
        }
    };

    check_keys(&options)?;

    serde_yaml::from_value(Value::Mapping(options)).map_err(|e| ConfigError::InvalidValue {
        field: PLUGIN_NAME.to_string(),
        value: e.to_string(),
        expected: "enable: bool, evaluator_bin/evaluator_extra_args/template: string".to_string(),
    })
}

/// Extracts this plugin's options from an mkdocs `plugins:` value.
///
/// mkdocs allows the list form (`- name` or `- name: {options}`) and the
/// mapping form (`name: {options}`).
fn plugin_entry(plugins: Value, path: &Path) -> Result<Mapping, ConfigError> {
    let entry = match plugins {
        Value::Sequence(items) => items.into_iter().find_map(|item| match item {
            Value::String(name) if name == PLUGIN_NAME => Some(Value::Null),
            Value::Mapping(mut map) => map.remove(PLUGIN_NAME),
            _ => None,
        }),
        Value::Mapping(mut map) => map.remove(PLUGIN_NAME),
        other => {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("'plugins' must be a list, found {}", value_kind(&other)),
            });
        }
    };

    match entry {
        None | Some(Value::Null) => Ok(Mapping::new()),
        Some(Value::Mapping(options)) => Ok(options),
        Some(other) => Err(ConfigError::InvalidValue {
            field: PLUGIN_NAME.to_string(),
            value: value_kind(&other).to_string(),
            expected: "a mapping of plugin options".to_string(),
        }),
    }
}

/// Rejects option names the plugin does not define.
fn check_keys(options: &Mapping) -> Result<(), ConfigError> {
    for key in options.keys() {
        let name = match key {
            Value::String(s) => s.as_str(),
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "option name".to_string(),
                    value: format!("{other:?}"),
                    expected: "a string".to_string(),
                });
            }
        };
        if !KNOWN_KEYS.contains(&name) {
            return Err(ConfigError::UnknownKey {
                key: name.to_string(),
                suggestion: suggest_key(name),
            });
        }
    }
    Ok(())
}

/// Suggest a known option name for typo correction.
///
/// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
#[must_use]
pub fn suggest_key(input: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|k| (*k, strsim::damerau_levenshtein(input, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(yaml: &str) -> Result<PluginConfig, ConfigError> {
        parse_config(yaml, &PathBuf::from("test.yml"))
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse("").unwrap(), PluginConfig::default());
    }

    #[test]
    fn test_bare_mapping() {
        let config = parse(
            "enable: false\nevaluator_bin: /usr/bin/nix\nevaluator_extra_args: --show-trace\ntemplate: t.md\n",
        )
        .unwrap();
        assert!(!config.enable);
        assert_eq!(config.evaluator_bin, "/usr/bin/nix");
        assert_eq!(config.evaluator_extra_args, "--show-trace");
        assert_eq!(config.template, "t.md");
    }

    #[test]
    fn test_bare_mapping_with_mkdocs_spellings() {
        let config =
            parse("nix_bin: /usr/bin/nix\nnix_command_extra_args: --show-trace\n").unwrap();
        assert_eq!(config.evaluator_bin, "/usr/bin/nix");
        assert_eq!(config.evaluator_extra_args, "--show-trace");
    }

    #[test]
    fn test_both_spellings_of_one_option_rejected() {
        let err = parse("evaluator_bin: /a/nix\nnix_bin: /b/nix\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_mkdocs_plugin_list_with_options() {
        let yaml = r"
site_name: My Docs
plugins:
  - search
  - nixos-options:
      nix_bin: /opt/nix/bin/nix
      evaluator_extra_args: --offline
";
        let config = parse(yaml).unwrap();
        assert_eq!(config.evaluator_bin, "/opt/nix/bin/nix");
        assert_eq!(config.evaluator_extra_args, "--offline");
        assert!(config.enable);
    }

    #[test]
    fn test_mkdocs_plugin_list_bare_name() {
        let yaml = "plugins:\n  - search\n  - nixos-options\n";
        assert_eq!(parse(yaml).unwrap(), PluginConfig::default());
    }

    #[test]
    fn test_mkdocs_plugin_list_without_entry() {
        let yaml = "plugins:\n  - search\n";
        assert_eq!(parse(yaml).unwrap(), PluginConfig::default());
    }

    #[test]
    fn test_mkdocs_plugin_mapping_form() {
        let yaml = "plugins:\n  nixos-options:\n    enable: false\n";
        assert!(!parse(yaml).unwrap().enable);
    }

    #[test]
    fn test_mkdocs_python_tags_are_tolerated() {
        let yaml = r"
markdown_extensions:
  - pymdownx.superfences:
      custom_fences:
        - name: mermaid
          format: !!python/name:pymdownx.superfences.fence_code_format
plugins:
  - nixos-options:
      template: option.md
";
        assert_eq!(parse(yaml).unwrap().template, "option.md");
    }

    #[test]
    fn test_unknown_key_with_suggestion() {
        let err = parse("evaluator_bn: nix\n").unwrap_err();
        match err {
            ConfigError::UnknownKey { key, suggestion } => {
                assert_eq!(key, "evaluator_bn");
                assert_eq!(suggestion.as_deref(), Some("evaluator_bin"));
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_value_type() {
        let err = parse("enable: sometimes\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_yaml_reports_line() {
        let err = parse("enable: true\nevaluator_bin: [unclosed\n").unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_document_rejected() {
        let err = parse("just a string").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/tmp/nixos_options_missing_config.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkdocs.yml");
        std::fs::write(&path, "plugins:\n  - nixos-options:\n      enable: false\n").unwrap();
        assert!(!load_config(&path).unwrap().enable);
    }

    #[test]
    fn test_suggest_key() {
        assert_eq!(suggest_key("templat").as_deref(), Some("template"));
        assert_eq!(suggest_key("completely_unrelated"), None);
    }
}
