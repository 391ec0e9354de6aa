//! Interest-rate conversions between simple (APR) and compounded (APY)
//! annual rates.

/// Daily compounding, the convention for the interest-bearing crypto
/// positions this tool tracks.
pub const DEFAULT_COMPOUNDING_PERIODS: f64 = 365.0;

/// Annual percentage rate to annual percentage yield under `n` compounding
/// periods per year: `(1 + apr/n)^n - 1`.
pub fn apr_to_apy(apr: f64, periods_per_year: f64) -> f64 {
    (1.0 + apr / periods_per_year).powf(periods_per_year) - 1.0
}

/// Annual percentage yield back to the simple rate:
/// `n * ((apy + 1)^(1/n) - 1)`. Exact inverse of [`apr_to_apy`] up to
/// floating-point tolerance.
pub fn apy_to_apr(apy: f64, periods_per_year: f64) -> f64 {
    periods_per_year * ((apy + 1.0).powf(1.0 / periods_per_year) - 1.0)
}
