use crate::error::{Arity, EvaluationError};
use crate::functions::Whitelist;
use exprcalc_macros::math_fn;
use std::ops::Range;

pub fn register(whitelist: &mut Whitelist) {
    whitelist.register_function("factorial", factorial);
    whitelist.register_function("comb", comb);
    whitelist.register_function("perm", perm);
    whitelist.register_function("gcd", gcd);
    whitelist.register_function("lcm", lcm);
    whitelist.register_function("isqrt", isqrt);
}

/// Largest `n` whose factorial is still a finite f64.
const FACTORIAL_LIMIT: u64 = 170;

#[math_fn]
pub fn factorial(n: u64) -> f64 {
    if n > FACTORIAL_LIMIT {
        f64::INFINITY
    } else {
        falling_product(n, n)
    }
}

/// Number of ways to choose `k` items from `n` without order.
#[math_fn]
pub fn comb(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);

    let mut exact: u128 = 1;
    for i in 0..k {
        // exact * (n - i) is always divisible by i + 1 here
        match exact.checked_mul((n - i) as u128) {
            Some(product) => exact = product / (i + 1) as u128,
            None => {
                // k <= n - k keeps every remaining factor at or above 1
                return finish_in_float(exact as f64, i..k, |j| {
                    (n - j) as f64 / (j + 1) as f64
                });
            }
        }
    }
    exact as f64
}

/// `perm(n)` is `n!`, `perm(n, k)` counts ordered selections of `k` items.
pub fn perm(args: &[f64]) -> Result<f64, EvaluationError> {
    let (n, k) = match *args {
        [n] => {
            let n = non_negative("perm", n)?;
            (n, n)
        }
        [n, k] => (non_negative("perm", n)?, non_negative("perm", k)?),
        _ => {
            return Err(EvaluationError::Arity {
                function: "perm",
                expected: Arity::Between(1, 2),
                found: args.len(),
            })
        }
    };

    if k > n {
        Ok(0.0)
    } else {
        Ok(falling_product(n, k))
    }
}

/// Greatest common divisor of any number of integers; `gcd()` is `0`.
pub fn gcd(args: &[f64]) -> Result<f64, EvaluationError> {
    let mut divisor = 0;
    for value in args {
        divisor = euclid(divisor, magnitude("gcd", *value)?);
    }
    Ok(divisor as f64)
}

/// Least common multiple of any number of integers; `lcm()` is `1`.
pub fn lcm(args: &[f64]) -> Result<f64, EvaluationError> {
    let magnitudes = args
        .iter()
        .map(|value| magnitude("lcm", *value))
        .collect::<Result<Vec<_>, _>>()?;

    if magnitudes.contains(&0) {
        return Ok(0.0);
    }

    let mut multiple: u128 = 1;
    for value in magnitudes {
        multiple = (multiple / euclid(multiple, value))
            .checked_mul(value)
            .ok_or_else(|| EvaluationError::Domain {
                function: "lcm",
                reason: "result too large".to_string(),
            })?;
    }
    Ok(multiple as f64)
}

/// Floor of the exact square root.
#[math_fn]
pub fn isqrt(n: u64) -> f64 {
    let n = n as u128;
    let mut root = (n as f64).sqrt() as u128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root as f64
}

/// `n * (n - 1) * ... * (n - k + 1)`, exact while it fits in a u128.
fn falling_product(n: u64, k: u64) -> f64 {
    let mut exact: u128 = 1;
    for i in 0..k {
        match exact.checked_mul((n - i) as u128) {
            Some(product) => exact = product,
            None => return finish_in_float(exact as f64, i..k, |j| (n - j) as f64),
        }
    }
    exact as f64
}

/// Carries a running product on in f64 once it outgrows a u128.
///
/// Every remaining factor is at least 1, so the product never shrinks and
/// the loop stops as soon as it reaches infinity. Before that it at least
/// doubles on all but the last step, which bounds the work to roughly a
/// thousand iterations whatever `steps` is.
fn finish_in_float(mut value: f64, steps: Range<u64>, factor: impl Fn(u64) -> f64) -> f64 {
    for j in steps {
        value *= factor(j);
        if value.is_infinite() {
            break;
        }
    }
    value
}

fn euclid(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn integral(function: &'static str, value: f64) -> Result<f64, EvaluationError> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value)
    } else {
        Err(EvaluationError::NotIntegral { function, value })
    }
}

fn non_negative(function: &'static str, value: f64) -> Result<u64, EvaluationError> {
    let value = integral(function, value)?;
    if value < 0.0 {
        return Err(EvaluationError::Domain {
            function,
            reason: "not defined for negative values".to_string(),
        });
    }
    if value >= 2f64.powi(64) {
        return Err(EvaluationError::Domain {
            function,
            reason: "argument too large".to_string(),
        });
    }
    Ok(value as u64)
}

fn magnitude(function: &'static str, value: f64) -> Result<u128, EvaluationError> {
    let magnitude = integral(function, value)?.abs();
    if magnitude >= 2f64.powi(128) {
        return Err(EvaluationError::Domain {
            function,
            reason: "argument too large".to_string(),
        });
    }
    Ok(magnitude as u128)
}
