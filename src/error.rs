//! Error types for `nixos-options`
//!
//! One enum per failure domain (configuration, evaluator, template) and a
//! top-level error that aggregates them and maps each to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `nixos-options` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, unknown key)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Evaluator error (nix failed to run, exited non-zero, bad output)
    pub const EVALUATOR_ERROR: i32 = 4;

    /// Template error (syntax, missing template, render failure)
    pub const TEMPLATE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `nixos-options` operations.
#[derive(Debug, Error)]
pub enum NixOptionsError {
    /// Configuration loading error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Module evaluation error
    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),

    /// Template loading or rendering error
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Invalid combination of command-line arguments
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NixOptionsError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Evaluator(_) => ExitCode::EVALUATOR_ERROR,
            Self::Template(_) => ExitCode::TEMPLATE_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Option name not recognized by the plugin
    #[error("unknown option '{key}'{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownKey {
        /// The unrecognized key
        key: String,
        /// Closest known option name, if any is similar enough
        suggestion: Option<String>,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

// ============================================================================
// Evaluator Errors
// ============================================================================

/// Errors raised while running the external evaluator.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The evaluator binary could not be started
    #[error("Failed to run command: {command}. Error: {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The evaluator exited with a non-zero status
    #[error("Failed to run nix command: {stderr}. Command: {command}")]
    NonZeroExit {
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
        /// The command line that was run
        command: String,
    },

    /// Standard output was not a JSON object of option records
    #[error("Failed to parse nix output as JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

// ============================================================================
// Template Errors
// ============================================================================

/// Template loading and rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template source failed to parse
    #[error("Failed to load the template due to syntax error: {message}")]
    Syntax {
        /// Template identifier
        name: String,
        /// Parser message, including location
        message: String,
    },

    /// No template is registered under the configured name
    #[error("template not found: {name}")]
    NotFound {
        /// Template identifier or path that was looked up
        name: String,
    },

    /// Any other failure while loading a template
    #[error("Failed to load the template {name}: {message}")]
    Load {
        /// Template identifier
        name: String,
        /// Engine message
        message: String,
    },

    /// Rendering one option record failed
    #[error("Failed to render the template for option '{key}': {message}")]
    Render {
        /// Key of the option being rendered
        key: String,
        /// Engine message
        message: String,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `nixos-options` operations.
pub type Result<T> = std::result::Result<T, NixOptionsError>;

// ============================================================================
// Tests
// ============================================================================
