use std::fmt;

/// Number of arguments a whitelisted function accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "argument"
    } else {
        "arguments"
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exactly(n) => write!(f, "exactly {} {}", n, plural(n)),
            Arity::Between(min, max) => write!(f, "from {} to {} arguments", min, max),
            Arity::AtLeast(min) => write!(f, "at least {} {}", min, plural(min)),
        }
    }
}

/// Failure raised by a native numeric function at evaluation time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("{function}() takes {expected} ({found} given)")]
    Arity {
        function: &'static str,
        expected: Arity,
        found: usize,
    },

    #[error("{function}() only accepts integral values, got {value:?}")]
    NotIntegral { function: &'static str, value: f64 },

    #[error("{function}() {reason}")]
    Domain {
        function: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid syntax at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unsupported syntax: {0}")]
    UnsupportedSyntax(String),

    #[error("name '{0}' is not defined")]
    NameNotFound(String),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl Error {
    pub fn unsupported(description: impl Into<String>) -> Self {
        Error::UnsupportedSyntax(description.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
