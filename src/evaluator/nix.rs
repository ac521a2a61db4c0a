//! `nix eval` subprocess evaluator.
//!
//! Runs `<evaluator_bin> eval --impure --json --expr <expression> <extra_args>
//! --extra-experimental-features "flakes nix-command"` and decodes the JSON
//! printed on stdout. The call blocks until the process exits; there is no
//! timeout.

use std::process::{Command, Stdio};

use tracing::{debug, error, warn};

use crate::config::schema::PluginConfig;
use crate::error::EvaluatorError;
use crate::evaluator::ModuleEvaluator;
use crate::evaluator::expression::nix_expression;
use crate::options::{EvaluatorResponse, parse_response};

/// Evaluates modules by shelling out to the `nix` CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NixEvaluator {
    nix_bin: String,
    extra_args: String,
}

impl NixEvaluator {
    /// Creates an evaluator for the given binary and extra argument.
    pub fn new(nix_bin: impl Into<String>, extra_args: impl Into<String>) -> Self {
        Self {
            nix_bin: nix_bin.into(),
            extra_args: extra_args.into(),
        }
    }

    /// Creates an evaluator from plugin configuration.
    #[must_use]
    pub fn from_config(config: &PluginConfig) -> Self {
        Self::new(&config.evaluator_bin, &config.evaluator_extra_args)
    }

    /// Evaluator executable.
    #[must_use]
    pub fn nix_bin(&self) -> &str {
        &self.nix_bin
    }

    /// Arguments passed to the evaluator for `module_path`.
    ///
    /// The extra-args setting is always passed as exactly one argument, even
    /// when empty.
    #[must_use]
    pub fn command_args(&self, module_path: &str) -> Vec<String> {
        vec![
            "eval".to_string(),
            "--impure".to_string(),
            "--json".to_string(),
            "--expr".to_string(),
            nix_expression(module_path),
            self.extra_args.clone(),
            "--extra-experimental-features".to_string(),
            "flakes nix-command".to_string(),
        ]
    }

    /// Shell-quoted command line, for logs and error messages.
    fn display_command(&self, args: &[String]) -> String {
        let parts = std::iter::once(self.nix_bin.as_str()).chain(args.iter().map(String::as_str));
        shlex::try_join(parts.clone()).unwrap_or_else(|_| parts.collect::<Vec<_>>().join(" "))
    }
}

impl Default for NixEvaluator {
    fn default() -> Self {
        Self::from_config(&PluginConfig::default())
    }
}

impl ModuleEvaluator for NixEvaluator {
    fn evaluate(&self, module_path: &str) -> Result<EvaluatorResponse, EvaluatorError> {
        let args = self.command_args(module_path);
        let command = self.display_command(&args);
        debug!(command = %command, "running nix evaluator");

        let output = Command::new(&self.nix_bin)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                error!("Failed to run command: {command}. Error: {e}");
                EvaluatorError::Spawn {
                    command: command.clone(),
                    source: e,
                }
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            error!("Failed to run nix command: {stderr}");
            return Err(EvaluatorError::NonZeroExit {
                code: output.status.code(),
                stderr,
                command,
            });
        }

        if !stderr.trim().is_empty() {
            warn!(module = module_path, stderr = %stderr, "nix evaluator produced stderr output");
        }

        parse_response(&output.stdout).inspect_err(|_| {
            error!("Failed to parse nix output as JSON");
            debug!(
                stdout = %String::from_utf8_lossy(&output.stdout),
                "nix output that failed to parse"
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{LazyLock, Mutex, PoisonError};

    // Writing an executable while another test thread forks can make exec
    // fail with ETXTBSY, so tests that spawn processes run one at a time.
    static SPAWN_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    #[test]
    fn test_command_args_shape() {
        let evaluator = NixEvaluator::new("nix", "");
        let args = evaluator.command_args("./module.nix");

        assert_eq!(args.len(), 8);
        assert_eq!(&args[..4], ["eval", "--impure", "--json", "--expr"]);
        assert!(args[4].contains("optionsPath = ./module.nix"));
        assert_eq!(args[5], "");
        assert_eq!(args[6], "--extra-experimental-features");
        assert_eq!(args[7], "flakes nix-command");
    }

    #[test]
    fn test_extra_args_passed_as_single_argument() {
        let evaluator = NixEvaluator::new("nix", "--show-trace --option foo bar");
        let args = evaluator.command_args("m");
        assert_eq!(args[5], "--show-trace --option foo bar");
    }

    #[test]
    fn test_from_config() {
        let config = PluginConfig {
            evaluator_bin: "/opt/nix/bin/nix".to_string(),
            evaluator_extra_args: "--offline".to_string(),
            ..PluginConfig::default()
        };
        let evaluator = NixEvaluator::from_config(&config);
        assert_eq!(evaluator.nix_bin(), "/opt/nix/bin/nix");
        assert_eq!(evaluator, NixEvaluator::new("/opt/nix/bin/nix", "--offline"));
        assert_eq!(NixEvaluator::default().nix_bin(), "nix");
    }

    #[test]
    fn test_display_command_quotes_arguments() {
        let evaluator = NixEvaluator::new("nix", "");
        let args = evaluator.command_args("./m.nix");
        let shown = evaluator.display_command(&args);
        let mut expected = vec!["nix".to_string()];
        expected.extend(args);
        assert_eq!(shlex::split(&shown), Some(expected));
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let evaluator = NixEvaluator::new("/nonexistent/nixos-options-test/nix", "");
        let err = evaluator.evaluate("m").unwrap_err();
        match err {
            EvaluatorError::Spawn { command, .. } => {
                assert!(command.starts_with("/nonexistent/nixos-options-test/nix eval"));
            }
            other => panic!("expected Spawn, got {other:?}"),
        }
    }

    #[cfg(unix)]
    mod fake_nix {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};

        fn write_script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("nix");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn run(
            body: &str,
            extra_args: &str,
        ) -> (Result<EvaluatorResponse, EvaluatorError>, tempfile::TempDir) {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(dir.path(), body);
            let evaluator = NixEvaluator::new(script.to_str().unwrap(), extra_args);
            (evaluator.evaluate("example_module_path"), dir)
        }

        #[test]
        fn test_successful_evaluation() {
            let (result, _dir) = run(
                r#"echo '{"key": {"type": "str", "description": "example description", "default": "example default"}}'"#,
                "",
            );
            let response = result.unwrap();
            assert_eq!(response.len(), 1);
            let fields = response["key"].fields("key");
            assert_eq!(fields.kind, "str");
            assert_eq!(fields.description, "example description");
            assert_eq!(fields.default, "example default");
        }

        #[test]
        fn test_non_zero_exit_carries_stderr() {
            let (result, _dir) = run(
                "echo \"error: getting status of '/x.nix': No such file or directory\" >&2\nexit 1",
                "",
            );
            let err = result.unwrap_err();
            let msg = err.to_string();
            assert!(msg.starts_with("Failed to run nix command: "), "{msg}");
            assert!(msg.contains("No such file or directory"), "{msg}");
            match err {
                EvaluatorError::NonZeroExit { code, command, .. } => {
                    assert_eq!(code, Some(1));
                    assert!(command.contains("--impure"));
                }
                other => panic!("expected NonZeroExit, got {other:?}"),
            }
        }

        #[test]
        fn test_non_zero_exit_with_empty_output() {
            let (result, _dir) = run("exit 1", "");
            assert!(matches!(
                result.unwrap_err(),
                EvaluatorError::NonZeroExit { .. }
            ));
        }

        #[test]
        fn test_malformed_json_is_decode_error() {
            let (result, _dir) = run("echo 'not json'", "");
            assert!(matches!(result.unwrap_err(), EvaluatorError::Decode(_)));
        }

        #[test]
        fn test_stderr_on_success_is_tolerated() {
            let (result, _dir) = run(
                "echo 'warning: Git tree is dirty' >&2\necho '{}'",
                "",
            );
            assert!(result.unwrap().is_empty());
        }

        #[test]
        fn test_arguments_reach_the_process() {
            let (result, dir) = run(
                r#"printf '%s\n' "$#" "$1" "$6" "$7" "$8" > "$(dirname "$0")/args"
echo '{}'"#,
                "--show-trace",
            );
            result.unwrap();
            let recorded = std::fs::read_to_string(dir.path().join("args")).unwrap();
            let lines: Vec<&str> = recorded.lines().collect();
            assert_eq!(
                lines,
                vec![
                    "8",
                    "eval",
                    "--show-trace",
                    "--extra-experimental-features",
                    "flakes nix-command"
                ]
            );
        }
    }
}
