use crate::functions::Whitelist;
use exprcalc_macros::math_fn;

pub fn register(whitelist: &mut Whitelist) {
    whitelist.register_function("ceil", ceil);
    whitelist.register_function("floor", floor);
    whitelist.register_function("trunc", trunc);
    whitelist.register_function("fabs", fabs);
    whitelist.register_function("copysign", copysign);
    whitelist.register_function("fmod", fmod);
    whitelist.register_function("remainder", remainder);
    whitelist.register_function("ldexp", ldexp);
    whitelist.register_function("nextafter", nextafter);
    whitelist.register_function("ulp", ulp);
}

#[math_fn]
pub fn ceil(x: f64) -> f64 {
    x.ceil()
}

#[math_fn]
pub fn floor(x: f64) -> f64 {
    x.floor()
}

#[math_fn]
pub fn trunc(x: f64) -> f64 {
    x.trunc()
}

#[math_fn]
pub fn fabs(x: f64) -> f64 {
    x.abs()
}

#[math_fn]
pub fn copysign(x: f64, y: f64) -> f64 {
    x.copysign(y)
}

/// Remainder with the sign of `x`, same as the `%` operator.
#[math_fn]
pub fn fmod(x: f64, y: f64) -> f64 {
    x % y
}

/// IEEE 754 remainder: `x - n*y` with `n` the integer nearest `x/y`, ties to even.
#[math_fn]
pub fn remainder(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() || x.is_infinite() || y == 0.0 {
        f64::NAN
    } else if y.is_infinite() {
        x
    } else {
        let (abs_x, abs_y) = (x.abs(), y.abs());
        let m = abs_x % abs_y;
        let c = abs_y - m;
        let r = if m < c {
            m
        } else if m > c {
            -c
        } else {
            // exact half: pick the even multiple
            m - 2.0 * ((0.5 * (abs_x - m)) % abs_y)
        };
        1f64.copysign(x) * r
    }
}

/// `x * 2**i`, stepping the exponent so intermediate powers never overflow.
#[math_fn]
pub fn ldexp(x: f64, i: i64) -> f64 {
    let mut exponent = i.clamp(-2200, 2200) as i32;
    let mut value = x;
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent)
}

#[math_fn]
pub fn nextafter(x: f64, y: f64) -> f64 {
    step_toward(x, y)
}

/// Distance from `|x|` to the next representable float away from zero.
#[math_fn]
pub fn ulp(x: f64) -> f64 {
    let x = x.abs();
    if x.is_nan() || x.is_infinite() {
        x
    } else if x == f64::MAX {
        x - step_toward(x, 0.0)
    } else {
        step_toward(x, f64::INFINITY) - x
    }
}

fn step_toward(x: f64, y: f64) -> f64 {
    if x.is_nan() || y.is_nan() {
        return f64::NAN;
    }
    if x == y {
        return y;
    }
    if x == 0.0 {
        return f64::from_bits(1).copysign(y);
    }

    let bits = x.to_bits();
    let away_from_zero = (y > x) == (x > 0.0);
    f64::from_bits(if away_from_zero { bits + 1 } else { bits - 1 })
}
