use crate::error::EvaluationError;
use crate::functions::Whitelist;
use exprcalc_macros::math_fn;

pub fn register(whitelist: &mut Whitelist) {
    whitelist.register_function("sin", sin);
    whitelist.register_function("cos", cos);
    whitelist.register_function("tan", tan);
    whitelist.register_function("asin", asin);
    whitelist.register_function("acos", acos);
    whitelist.register_function("atan", atan);
    whitelist.register_function("atan2", atan2);
    whitelist.register_function("sinh", sinh);
    whitelist.register_function("cosh", cosh);
    whitelist.register_function("tanh", tanh);
    whitelist.register_function("asinh", asinh);
    whitelist.register_function("acosh", acosh);
    whitelist.register_function("atanh", atanh);
    whitelist.register_function("degrees", degrees);
    whitelist.register_function("radians", radians);
    whitelist.register_function("hypot", hypot);
}

#[math_fn]
pub fn sin(x: f64) -> f64 {
    x.sin()
}

#[math_fn]
pub fn cos(x: f64) -> f64 {
    x.cos()
}

#[math_fn]
pub fn tan(x: f64) -> f64 {
    x.tan()
}

#[math_fn]
pub fn asin(x: f64) -> f64 {
    x.asin()
}

#[math_fn]
pub fn acos(x: f64) -> f64 {
    x.acos()
}

#[math_fn]
pub fn atan(x: f64) -> f64 {
    x.atan()
}

#[math_fn]
pub fn atan2(y: f64, x: f64) -> f64 {
    y.atan2(x)
}

#[math_fn]
pub fn sinh(x: f64) -> f64 {
    x.sinh()
}

#[math_fn]
pub fn cosh(x: f64) -> f64 {
    x.cosh()
}

#[math_fn]
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

#[math_fn]
pub fn asinh(x: f64) -> f64 {
    x.asinh()
}

#[math_fn]
pub fn acosh(x: f64) -> f64 {
    x.acosh()
}

#[math_fn]
pub fn atanh(x: f64) -> f64 {
    x.atanh()
}

#[math_fn]
pub fn degrees(x: f64) -> f64 {
    x.to_degrees()
}

#[math_fn]
pub fn radians(x: f64) -> f64 {
    x.to_radians()
}

/// Euclidean norm of any number of coordinates; `hypot()` is `0.0`.
pub fn hypot(args: &[f64]) -> Result<f64, EvaluationError> {
    Ok(args.iter().fold(0.0, |norm, x| norm.hypot(*x)))
}
