use crate::functions::Whitelist;
use exprcalc_macros::math_fn;

pub fn register(whitelist: &mut Whitelist) {
    whitelist.register_function("isfinite", isfinite);
    whitelist.register_function("isinf", isinf);
    whitelist.register_function("isnan", isnan);
    whitelist.register_function("isclose", isclose);
}

const RELATIVE_TOLERANCE: f64 = 1e-9;
const ABSOLUTE_TOLERANCE: f64 = 0.0;

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[math_fn]
pub fn isfinite(x: f64) -> f64 {
    truth(x.is_finite())
}

#[math_fn]
pub fn isinf(x: f64) -> f64 {
    truth(x.is_infinite())
}

#[math_fn]
pub fn isnan(x: f64) -> f64 {
    truth(x.is_nan())
}

/// Relative tolerance `1e-9`, no absolute tolerance. Infinities are only
/// close to themselves.
#[math_fn]
pub fn isclose(a: f64, b: f64) -> f64 {
    truth(is_close(a, b))
}

fn is_close(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let difference = (b - a).abs();
    difference <= (RELATIVE_TOLERANCE * b).abs()
        || difference <= (RELATIVE_TOLERANCE * a).abs()
        || difference <= ABSOLUTE_TOLERANCE
}
