use rand::Rng;

/// Geometric Brownian Motion path generation.
///
/// The random source is always injected so runs are reproducible under a
/// seeded generator; nothing here touches a process-global RNG.

/// Standard-normal deviate via the Box-Muller transform.
/// Each uniform is re-drawn while exactly 0.0 so ln(u) stays finite;
/// `gen::<f64>()` covers [0, 1).
pub fn gaussian_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let mut u: f64 = 0.0;
    while u == 0.0 {
        u = rng.gen();
    }
    let mut v: f64 = 0.0;
    while v == 0.0 {
        v = rng.gen();
    }
    (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
}

/// One multiplicative GBM step: exp((mu - sigma^2/2)*dt + sigma*sqrt(dt)*z).
/// sigma = 0 collapses to the deterministic drift factor.
#[inline]
pub fn gbm_step<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64, dt: f64) -> f64 {
    let z = gaussian_sample(rng);
    ((mu - 0.5 * sigma * sigma) * dt + sigma * dt.sqrt() * z).exp()
}

/// Simulate a full price path. Returned path has steps + 1 entries with
/// path[0] == s0. Each call owns a fresh buffer; paths are never shared
/// across trials.
pub fn simulate_path<R: Rng + ?Sized>(
    rng: &mut R,
    s0: f64,
    mu: f64,
    sigma: f64,
    dt: f64,
    steps: usize,
) -> Vec<f64> {
    let mut path = Vec::with_capacity(steps + 1);
    path.push(s0);
    let mut price = s0;
    for _ in 0..steps {
        price *= gbm_step(rng, mu, sigma, dt);
        path.push(price);
    }
    path
}
