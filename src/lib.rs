pub mod ast;
pub mod cli;
pub mod error;
pub mod functions;

pub use ast::{parse, Evaluator, Expr};
pub use error::{Arity, Error, EvaluationError, Result};
pub use functions::Whitelist;

use rayon::prelude::*;

/// Parses and evaluates `expression` against the standard whitelist.
///
/// ```
/// assert_eq!(exprcalc::evaluate("2 + 2 * 3"), Ok(8.0));
/// assert!(exprcalc::evaluate("unknown(1)").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<f64> {
    Evaluator::default().evaluate_expression(expression)
}

/// Evaluates every expression on the rayon pool. Results keep input order.
pub fn evaluate_batch<S>(expressions: &[S]) -> Vec<Result<f64>>
where
    S: AsRef<str> + Sync,
{
    let evaluator = Evaluator::default();
    expressions
        .par_iter()
        .map(|expression| evaluator.evaluate_expression(expression.as_ref()))
        .collect()
}
