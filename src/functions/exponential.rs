use crate::error::{Arity, EvaluationError};
use crate::functions::Whitelist;
use exprcalc_macros::math_fn;

pub fn register(whitelist: &mut Whitelist) {
    whitelist.register_function("exp", exp);
    whitelist.register_function("exp2", exp2);
    whitelist.register_function("expm1", expm1);
    whitelist.register_function("log", log);
    whitelist.register_function("log2", log2);
    whitelist.register_function("log10", log10);
    whitelist.register_function("log1p", log1p);
    whitelist.register_function("pow", pow);
    whitelist.register_function("sqrt", sqrt);
    whitelist.register_function("cbrt", cbrt);
}

#[math_fn]
pub fn exp(x: f64) -> f64 {
    x.exp()
}

#[math_fn]
pub fn exp2(x: f64) -> f64 {
    x.exp2()
}

#[math_fn]
pub fn expm1(x: f64) -> f64 {
    x.exp_m1()
}

/// `log(x)` is the natural logarithm, `log(x, base)` divides by `ln(base)`.
pub fn log(args: &[f64]) -> Result<f64, EvaluationError> {
    match *args {
        [x] => Ok(x.ln()),
        [x, base] => Ok(x.ln() / base.ln()),
        _ => Err(EvaluationError::Arity {
            function: "log",
            expected: Arity::Between(1, 2),
            found: args.len(),
        }),
    }
}

#[math_fn]
pub fn log2(x: f64) -> f64 {
    x.log2()
}

#[math_fn]
pub fn log10(x: f64) -> f64 {
    x.log10()
}

#[math_fn]
pub fn log1p(x: f64) -> f64 {
    x.ln_1p()
}

#[math_fn]
pub fn pow(x: f64, y: f64) -> f64 {
    x.powf(y)
}

#[math_fn]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[math_fn]
pub fn cbrt(x: f64) -> f64 {
    x.cbrt()
}
