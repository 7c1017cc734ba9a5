pub mod exponential;
pub mod integer;
pub mod predicates;
pub mod rounding;
pub mod special;
pub mod trigonometric;

use crate::error::EvaluationError;
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::f64::consts;

/// Native implementation behind a whitelisted function name.
pub type MathFunction = fn(&[f64]) -> Result<f64, EvaluationError>;

lazy_static! {
    static ref STANDARD: Whitelist = Whitelist::standard();
}

/// The closed set of names an expression may refer to.
///
/// Constants resolve as bare names, functions only as call targets. A name
/// lives in at most one of the two tables.
#[derive(Debug, Clone)]
pub struct Whitelist {
    constants: HashMap<&'static str, f64>,
    functions: HashMap<&'static str, MathFunction>,
}

impl Whitelist {
    /// Shared table used by `evaluate` and `Evaluator::default`.
    pub fn global() -> &'static Whitelist {
        &STANDARD
    }

    /// Builds a fresh copy of the standard table.
    pub fn standard() -> Self {
        let mut whitelist = Self {
            constants: HashMap::new(),
            functions: HashMap::new(),
        };
        register_constants(&mut whitelist);
        register_functions(&mut whitelist);
        debug!(
            "Whitelist ready: {} constants, {} functions",
            whitelist.constants.len(),
            whitelist.functions.len()
        );
        whitelist
    }

    pub(crate) fn register_constant(&mut self, name: &'static str, value: f64) {
        debug_assert!(
            !self.functions.contains_key(name),
            "{} is already a function",
            name
        );
        self.constants.insert(name, value);
    }

    pub(crate) fn register_function(&mut self, name: &'static str, function: MathFunction) {
        debug_assert!(
            !self.constants.contains_key(name),
            "{} is already a constant",
            name
        );
        self.functions.insert(name, function);
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<MathFunction> {
        self.functions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constants.contains_key(name) || self.functions.contains_key(name)
    }

    pub fn constant_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constants.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

fn register_constants(whitelist: &mut Whitelist) {
    whitelist.register_constant("pi", consts::PI);
    whitelist.register_constant("e", consts::E);
    whitelist.register_constant("tau", consts::TAU);
    whitelist.register_constant("inf", f64::INFINITY);
    whitelist.register_constant("nan", f64::NAN);
}

pub fn register_functions(whitelist: &mut Whitelist) {
    trigonometric::register(whitelist);
    exponential::register(whitelist);
    rounding::register(whitelist);
    special::register(whitelist);
    integer::register(whitelist);
    predicates::register(whitelist);
}
