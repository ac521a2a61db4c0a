//! Module evaluation.
//!
//! The expander only needs "module path in, ordered option records out".
//! [`ModuleEvaluator`] is that seam: [`NixEvaluator`] implements it by
//! running `nix eval`, and any `Fn(&str) -> Result<EvaluatorResponse, _>`
//! closure implements it too.

pub mod expression;
pub mod nix;

pub use expression::nix_expression;
pub use nix::NixEvaluator;

use crate::error::EvaluatorError;
use crate::options::EvaluatorResponse;

/// Resolves a module path into its option records.
pub trait ModuleEvaluator {
    /// Evaluates `module_path`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluatorError`] if evaluation fails or its output
    /// cannot be decoded.
    fn evaluate(&self, module_path: &str) -> Result<EvaluatorResponse, EvaluatorError>;
}

impl<F> ModuleEvaluator for F
where
    F: Fn(&str) -> Result<EvaluatorResponse, EvaluatorError>,
{
    fn evaluate(&self, module_path: &str) -> Result<EvaluatorResponse, EvaluatorError> {
        self(module_path)
    }
}
