//! Print the Nix expression for a module path.

use crate::cli::args::ExpressionArgs;
use crate::evaluator::nix_expression;

/// Print the evaluation expression to stdout.
pub fn run(args: &ExpressionArgs) {
    println!("{}", nix_expression(&args.module_path));
}
