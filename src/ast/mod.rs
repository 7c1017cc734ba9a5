use crate::error::{Error, Result};
use std::fmt;

mod evaluator;
mod parser;

pub use evaluator::Evaluator;
pub use parser::{parse, ExpressionParser as Parser, Rule};

/// Parsed expression tree.
///
/// The grammar is deliberately wider than what evaluates: anything beyond
/// literals, names, unary/binary arithmetic and direct calls is kept as its
/// own variant so the evaluator can reject it with a precise description.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Name(String),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: BinaryOperator,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Argument>,
    },
    Attribute {
        base: Box<Expr>,
        attribute: String,
    },
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Compare {
        left: Box<Expr>,
        operator: ComparisonOperator,
        right: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        operator: LogicalOperator,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Expr>,
        /// Value half of a dict comprehension's `key: value`.
        value: Option<Box<Expr>>,
        clauses: Vec<ComprehensionFor>,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    NamedExpr {
        target: String,
        value: Box<Expr>,
    },
    Starred(Box<Expr>),
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Number(value))
    }

    pub fn name(identifier: &str) -> Self {
        Expr::Name(identifier.to_string())
    }

    pub fn unary(operator: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: Expr, operator: BinaryOperator, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    pub fn call(function: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(Expr::name(function)),
            args: args.into_iter().map(Argument::Positional).collect(),
        }
    }

    /// Short human-readable label for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Expr::Literal(literal) => literal.describe(),
            Expr::Name(id) => format!("name '{}'", id),
            Expr::Unary { operator, .. } => format!("unary operator {}", operator),
            Expr::Binary { operator, .. } => format!("binary operator {}", operator),
            Expr::Call { callee, .. } => format!("call to {}", callee.describe()),
            Expr::Attribute { attribute, .. } => format!("attribute access .{}", attribute),
            Expr::Subscript { .. } => "subscript".to_string(),
            Expr::Tuple(_) => "tuple display".to_string(),
            Expr::List(_) => "list display".to_string(),
            Expr::Set(_) => "set display".to_string(),
            Expr::Dict(_) => "dict display".to_string(),
            Expr::Lambda { .. } => "lambda expression".to_string(),
            Expr::Conditional { .. } => "conditional expression".to_string(),
            Expr::Compare { operator, .. } => format!("comparison operator {}", operator),
            Expr::Logical { operator, .. } => format!("boolean operator {}", operator),
            Expr::Not(_) => "boolean operator not".to_string(),
            Expr::Comprehension { kind, .. } => kind.to_string(),
            Expr::Slice { .. } => "slice".to_string(),
            Expr::NamedExpr { .. } => "assignment expression".to_string(),
            Expr::Starred(_) => "starred expression".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    None,
    Imaginary(f64),
}

impl Literal {
    fn describe(&self) -> String {
        match self {
            Literal::Number(value) => format!("number {:?}", value),
            Literal::Str(value) => format!("string literal {:?}", value),
            Literal::Bool(true) => "boolean literal True".to_string(),
            Literal::Bool(false) => "boolean literal False".to_string(),
            Literal::None => "None literal".to_string(),
            Literal::Imaginary(value) => format!("imaginary literal {}j", value),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

impl fmt::Display for ComprehensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComprehensionKind::List => "list comprehension",
            ComprehensionKind::Set => "set comprehension",
            ComprehensionKind::Dict => "dict comprehension",
            ComprehensionKind::Generator => "generator expression",
        };
        f.write_str(label)
    }
}

/// One `for targets in iterable if condition...` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensionFor {
    pub targets: Vec<String>,
    pub iterable: Expr,
    pub conditions: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Positional(Expr),
    Keyword { name: String, value: Expr },
    /// `**mapping`
    KeywordUnpack(Expr),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Identity,
    Invert,
}

impl UnaryOperator {
    pub fn is_sign(&self) -> bool {
        matches!(self, UnaryOperator::Negate | UnaryOperator::Identity)
    }

    pub fn apply(&self, operand: f64) -> Result<f64> {
        match self {
            UnaryOperator::Negate => Ok(-operand),
            UnaryOperator::Identity => Ok(operand),
            UnaryOperator::Invert => Err(Error::unsupported(format!("unary operator {}", self))),
        }
    }
}

impl TryFrom<&str> for UnaryOperator {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "-" => Ok(UnaryOperator::Negate),
            "+" => Ok(UnaryOperator::Identity),
            "~" => Ok(UnaryOperator::Invert),
            _ => Err(format!("Unknown unary operator: {}", value)),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Identity => "+",
            UnaryOperator::Invert => "~",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    FloorDivide,
    MatrixMultiply,
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOperator {
    /// The six operators the evaluator computes; the rest only parse.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
                | BinaryOperator::Power
        )
    }

    /// IEEE-754 semantics throughout: dividing by zero yields an infinity or
    /// NaN, `%` keeps the sign of the dividend, and a power with no real
    /// result is NaN.
    pub fn apply(&self, left: f64, right: f64) -> Result<f64> {
        match self {
            BinaryOperator::Add => Ok(left + right),
            BinaryOperator::Subtract => Ok(left - right),
            BinaryOperator::Multiply => Ok(left * right),
            BinaryOperator::Divide => Ok(left / right),
            BinaryOperator::Modulo => Ok(left % right),
            BinaryOperator::Power => Ok(left.powf(right)),
            _ => Err(Error::unsupported(format!("binary operator {}", self))),
        }
    }
}

impl TryFrom<&str> for BinaryOperator {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "+" => Ok(BinaryOperator::Add),
            "-" => Ok(BinaryOperator::Subtract),
            "*" => Ok(BinaryOperator::Multiply),
            "/" => Ok(BinaryOperator::Divide),
            "%" => Ok(BinaryOperator::Modulo),
            "**" => Ok(BinaryOperator::Power),
            "//" => Ok(BinaryOperator::FloorDivide),
            "@" => Ok(BinaryOperator::MatrixMultiply),
            "&" => Ok(BinaryOperator::BitAnd),
            "|" => Ok(BinaryOperator::BitOr),
            "^" => Ok(BinaryOperator::BitXor),
            "<<" => Ok(BinaryOperator::LeftShift),
            ">>" => Ok(BinaryOperator::RightShift),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "**",
            BinaryOperator::FloorDivide => "//",
            BinaryOperator::MatrixMultiply => "@",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    NotIn,
    Is,
    IsNot,
}

impl TryFrom<&str> for ComparisonOperator {
    type Error = String;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            "==" => Ok(ComparisonOperator::Equal),
            "!=" => Ok(ComparisonOperator::NotEqual),
            "<" => Ok(ComparisonOperator::LessThan),
            "<=" => Ok(ComparisonOperator::LessThanOrEqual),
            ">" => Ok(ComparisonOperator::GreaterThan),
            ">=" => Ok(ComparisonOperator::GreaterThanOrEqual),
            "in" => Ok(ComparisonOperator::In),
            "not in" => Ok(ComparisonOperator::NotIn),
            "is" => Ok(ComparisonOperator::Is),
            "is not" => Ok(ComparisonOperator::IsNot),
            _ => Err(format!("Unknown comparison operator: {}", value)),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::In => "in",
            ComparisonOperator::NotIn => "not in",
            ComparisonOperator::Is => "is",
            ComparisonOperator::IsNot => "is not",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => f.write_str("and"),
            LogicalOperator::Or => f.write_str("or"),
        }
    }
}
