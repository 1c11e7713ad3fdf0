//! Closed-form statistical primitives for threshold derivation.
//!
//! Plain `f64` math, no dependencies. Approximations carry their
//! literature citations; everything must stay finite at the edges
//! (p = 0, p = 1, tiny n) rather than drifting into NaN.

/// Computes P(Z > z) for the standard normal distribution.
/// Uses Abramowitz & Stegun 26.2.17 rational approximation with Horner's
/// method. Caller must pass z >= 0 (use z.abs() before calling).
pub fn normal_sf(z: f64) -> f64 {
    debug_assert!(z >= 0.0, "normal_sf requires z >= 0, got {}", z);

    let t = 1.0 / (1.0 + 0.2316419 * z);
    let d = 0.3989422804014327; // 1/sqrt(2*pi)
    let p = d * (-z * z / 2.0).exp();

    // Horner's method for the polynomial
    let poly = t
        * (0.319381530
            + t * (-0.356563782 + t * (1.781477937 + t * (-1.821255978 + t * 1.330274429))));

    p * poly
}

/// Standard normal quantile (inverse CDF).
///
/// Peter Acklam's rational approximation: relative error below 1.15e-9
/// over the full open interval. Caller must pass p in (0, 1).
pub fn normal_quantile(p: f64) -> f64 {
    debug_assert!(
        p > 0.0 && p < 1.0,
        "normal_quantile requires p in (0, 1), got {}",
        p
    );

    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -((((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0))
    }
}

/// Standard error of a binomial proportion via the normal approximation.
///
/// Explicitly 0 at p = 0 and p = 1: a degenerate observed rate carries no
/// sampling noise under this approximation, and must never yield NaN.
pub fn proportion_standard_error(p: f64, n: u64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    (p * (1.0 - p) / n as f64).sqrt()
}

/// Lower-tail binomial probability P(X <= k) for X ~ Binomial(n, p).
///
/// Log-space PMF walk: terms too small to represent underflow to zero
/// harmlessly instead of poisoning the sum, so the result stays finite
/// for p near 0 or 1 and large n.
pub fn binomial_lower_tail(n: u64, k: u64, p: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&p), "p must be within [0, 1]");

    if p <= 0.0 {
        return 1.0;
    }
    if p >= 1.0 {
        return if k >= n { 1.0 } else { 0.0 };
    }

    let k = k.min(n);
    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();

    // ln pmf(0) = n ln(1-p); pmf(i+1)/pmf(i) = (n-i)/(i+1) * p/(1-p)
    let mut ln_pmf = n as f64 * ln_q;
    let mut cdf = ln_pmf.exp();
    for i in 0..k {
        ln_pmf += ((n - i) as f64).ln() - ((i + 1) as f64).ln() + ln_p - ln_q;
        cdf += ln_pmf.exp();
    }
    cdf.min(1.0)
}

/// Smallest success count k whose lower-tail probability under
/// Binomial(n, p) exceeds alpha.
///
/// Observing fewer than k successes would be significant evidence (at
/// level alpha) that the true rate sits below p. Always terminates:
/// the full tail at k = n is 1, and alpha < 1.
pub fn min_successes_above_alpha(n: u64, p: f64, alpha: f64) -> u64 {
    debug_assert!(alpha > 0.0 && alpha < 1.0, "alpha must be within (0, 1)");

    if p <= 0.0 {
        return 0;
    }
    if p >= 1.0 {
        return n;
    }

    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();
    let mut ln_pmf = n as f64 * ln_q;
    let mut cdf = ln_pmf.exp();
    let mut k = 0u64;
    while cdf <= alpha && k < n {
        ln_pmf += ((n - k) as f64).ln() - ((k + 1) as f64).ln() + ln_p - ln_q;
        cdf += ln_pmf.exp();
        k += 1;
    }
    k
}
