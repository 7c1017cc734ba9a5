use crate::ast::{Argument, Expr, Literal};
use crate::error::{Error, Result};
use crate::functions::Whitelist;
use log::debug;

/// Walks an expression tree and computes its value.
///
/// Only literals, whitelisted names, unary and binary arithmetic and direct
/// calls to whitelisted functions are evaluated. Every other node is
/// rejected before any of its children are looked at.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'w> {
    whitelist: &'w Whitelist,
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::new(Whitelist::global())
    }
}

impl<'w> Evaluator<'w> {
    pub fn new(whitelist: &'w Whitelist) -> Self {
        Self { whitelist }
    }

    pub fn whitelist(&self) -> &'w Whitelist {
        self.whitelist
    }

    /// Parses and evaluates `expression` in one go.
    pub fn evaluate_expression(&self, expression: &str) -> Result<f64> {
        let ast = crate::ast::parse(expression)?;
        self.evaluate(&ast)
    }

    /// Evaluates a parsed tree, depth first, children left to right.
    pub fn evaluate(&self, ast: &Expr) -> Result<f64> {
        match ast {
            Expr::Literal(Literal::Number(value)) => Ok(*value),
            Expr::Literal(_) => Err(Error::unsupported(ast.describe())),

            Expr::Name(id) => self
                .whitelist
                .constant(id)
                .ok_or_else(|| Error::NameNotFound(id.clone())),

            Expr::Unary { operator, operand } => {
                if !operator.is_sign() {
                    return Err(Error::unsupported(ast.describe()));
                }
                let value = self.evaluate(operand)?;
                operator.apply(value)
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                if !operator.is_arithmetic() {
                    return Err(Error::unsupported(ast.describe()));
                }
                let left_value = self.evaluate(left)?;
                let right_value = self.evaluate(right)?;
                operator.apply(left_value, right_value)
            }

            Expr::Call { callee, args } => self.evaluate_call(callee, args),

            other => Err(Error::unsupported(other.describe())),
        }
    }

    fn evaluate_call(&self, callee: &Expr, args: &[Argument]) -> Result<f64> {
        let Expr::Name(name) = callee else {
            return Err(Error::unsupported("only direct function names allowed"));
        };

        let function = self
            .whitelist
            .function(name)
            .ok_or_else(|| Error::NameNotFound(name.clone()))?;

        let values = args
            .iter()
            .filter_map(|arg| match arg {
                Argument::Positional(expr) => Some(self.evaluate(expr)),
                Argument::Keyword { .. } | Argument::KeywordUnpack(_) => None,
            })
            .collect::<Result<Vec<f64>>>()?;

        if let Some(keyword) = args.iter().find_map(|arg| match arg {
            Argument::Keyword { name, .. } => Some(format!("{}=...", name)),
            Argument::KeywordUnpack(_) => Some("**...".to_string()),
            Argument::Positional(_) => None,
        }) {
            return Err(Error::unsupported(format!(
                "keyword arguments not supported ({})",
                keyword
            )));
        }

        debug!("Calling {}({:?})", name, values);
        let result = function(&values)?;
        Ok(result)
    }
}
