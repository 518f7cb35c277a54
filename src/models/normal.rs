/// Standard normal CDF via the Abramowitz–Stegun five-coefficient erf
/// polynomial. Deterministic, no iteration, absolute error ~1.5e-7.
/// Total over all reals; monotonic non-decreasing with
/// norm_cdf(-x) == 1 - norm_cdf(x) up to the approximation error.

const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let erf = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * erf)
}
