use crate::functions::Whitelist;
use exprcalc_macros::math_fn;
use std::f64::consts::PI;

pub fn register(whitelist: &mut Whitelist) {
    whitelist.register_function("gamma", gamma);
    whitelist.register_function("lgamma", lgamma);
    whitelist.register_function("erf", erf);
    whitelist.register_function("erfc", erfc);
}

// Lanczos approximation, g = 7, n = 9.
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Past this point gamma overflows an f64.
const GAMMA_OVERFLOW: f64 = 171.7;

// Below this the power series for erf is accurate, above it the continued
// fraction for erfc is.
const ERF_SERIES_CUTOFF: f64 = 2.0;
const ERFC_FRACTION_TERMS: u32 = 120;

#[math_fn]
pub fn gamma(x: f64) -> f64 {
    gamma_value(x)
}

#[math_fn]
pub fn lgamma(x: f64) -> f64 {
    log_gamma_value(x)
}

#[math_fn]
pub fn erf(x: f64) -> f64 {
    erf_value(x)
}

#[math_fn]
pub fn erfc(x: f64) -> f64 {
    erfc_value(x)
}

fn lanczos_sum(z: f64) -> f64 {
    LANCZOS_COEFFICIENTS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS_COEFFICIENTS[0], |sum, (i, c)| {
            sum + c / (z + (i + 1) as f64)
        })
}

fn is_non_positive_integer(x: f64) -> bool {
    x <= 0.0 && x.fract() == 0.0
}

fn gamma_value(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        return f64::NAN;
    }
    if x == 0.0 {
        return f64::INFINITY.copysign(x);
    }
    if is_non_positive_integer(x) {
        return f64::NAN;
    }
    if x > GAMMA_OVERFLOW {
        return f64::INFINITY;
    }
    if x.fract() == 0.0 && x <= 23.0 {
        return (2..x as u64).fold(1.0, |product, k| product * k as f64);
    }
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma_value(1.0 - x));
    }

    let z = x - 1.0;
    let t = z + LANCZOS_G + 0.5;
    // split the power so t^(z+0.5) does not overflow before exp(-t) shrinks it
    let half_power = t.powf(0.5 * (z + 0.5));
    (2.0 * PI).sqrt() * half_power * (-t).exp() * half_power * lanczos_sum(z)
}

fn log_gamma_value(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x.is_infinite() || is_non_positive_integer(x) {
        return f64::INFINITY;
    }
    if x == 1.0 || x == 2.0 {
        return 0.0;
    }
    if x < 0.5 {
        return (PI / (PI * x).sin().abs()).ln() - log_gamma_value(1.0 - x);
    }

    let z = x - 1.0;
    let t = z + LANCZOS_G + 0.5;
    0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + lanczos_sum(z).ln()
}

/// erf(x) = 2/sqrt(pi) * exp(-x^2) * sum 2^n x^(2n+1) / (1*3*...*(2n+1)).
/// Every term is positive, so nothing cancels.
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    for n in 1..500 {
        term *= 2.0 * x2 / (2 * n + 1) as f64;
        sum += term;
        if term.abs() <= sum.abs() * f64::EPSILON {
            break;
        }
    }
    2.0 / PI.sqrt() * (-x2).exp() * sum
}

/// Laplace continued fraction, evaluated from the tail, for x >= 2.
fn erfc_continued_fraction(x: f64) -> f64 {
    let mut tail = x;
    for k in (1..=ERFC_FRACTION_TERMS).rev() {
        tail = x + (k as f64 / 2.0) / tail;
    }
    (-x * x).exp() / (PI.sqrt() * tail)
}

fn erf_value(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x.abs() < ERF_SERIES_CUTOFF {
        erf_series(x)
    } else {
        (1.0 - erfc_continued_fraction(x.abs())).copysign(x)
    }
}

fn erfc_value(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x < ERF_SERIES_CUTOFF {
        1.0 - erf_value(x)
    } else {
        erfc_continued_fraction(x)
    }
}
