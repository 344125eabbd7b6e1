//! Path length correction factor.
//!
//! `c(n)` is the average path length of an unsuccessful search in a binary
//! search tree over `n` keys. It is added to the depth of a terminal node to
//! account for the subtree that was never grown below it, and `c(psi)`
//! normalizes the average path length into an anomaly score.

/// Euler–Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Harmonic number approximation `H(i) = ln(i) + γ`.
pub fn harmonic(i: f64) -> f64 {
    i.ln() + EULER_GAMMA
}

/// Correction factor `c(n)`.
///
/// - `c(n) = 0` for `n <= 1`
/// - `c(2) = 1`
/// - `c(n) = 2·H(n - 1) - 2·(n - 1)/n` otherwise
pub fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * harmonic(n - 1.0) - 2.0 * (n - 1.0) / n
        }
    }
}
