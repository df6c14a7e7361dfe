//! Brent's method for bracketed scalar root finding.
//!
//! Combines bisection, secant and inverse quadratic interpolation. Each step
//! keeps a sign-changing bracket, takes an interpolated step when it shrinks
//! the bracket fast enough, and falls back to bisection otherwise, so the
//! worst case is bounded by the bisection iteration count.

use thiserror::Error;

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Maximum number of iterations.
    pub max_iters: usize,

    /// Absolute tolerance on the root location.
    pub x_abs_tol: f64,

    /// Relative tolerance on the root location.
    pub x_rel_tol: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 2e-12,
            x_rel_tol: 4.0 * f64::EPSILON,
        }
    }
}

/// Termination status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Converged,
    MaxIters,
}

/// Result of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Best root estimate.
    pub x: f64,

    /// Residual at `x`.
    pub residual: f64,

    /// Iterations performed.
    pub iters: usize,

    pub status: Status,
}

/// Errors from [`solve`].
#[derive(Debug, Error)]
pub enum Error<E> {
    /// The residual has the same sign at both ends of the bracket.
    #[error("residual does not change sign over [{lo}, {hi}]: f(lo)={f_lo}, f(hi)={f_hi}")]
    SameSign { lo: f64, hi: f64, f_lo: f64, f_hi: f64 },

    /// The residual function failed.
    #[error("residual evaluation failed at x={x}")]
    Eval {
        x: f64,
        #[source]
        source: E,
    },

    /// The bracket ends or tolerances are not finite, or the tolerance is not positive.
    #[error("invalid bracket or tolerance")]
    InvalidBracket,
}

/// Finds a root of `f` inside `bracket`.
///
/// The residual must change sign over the bracket. An end where the residual
/// is exactly zero is returned immediately.
///
/// # Errors
///
/// Returns [`Error::SameSign`] if there is no sign change,
/// [`Error::Eval`] if `f` fails, and [`Error::InvalidBracket`] if the
/// bracket or tolerances are unusable.
pub fn solve<F, E>(mut f: F, bracket: [f64; 2], config: &Config) -> Result<Solution, Error<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let [lo, hi] = bracket;
    let tolerances_ok = config.x_abs_tol > 0.0 && config.x_rel_tol >= 0.0;
    if !(lo.is_finite() && hi.is_finite() && tolerances_ok) {
        return Err(Error::InvalidBracket);
    }

    let mut eval = |x: f64| f(x).map_err(|source| Error::Eval { x, source });

    let mut x_pre = lo;
    let mut x_cur = hi;
    let mut f_pre = eval(x_pre)?;
    let mut f_cur = eval(x_cur)?;

    if f_pre == 0.0 {
        return Ok(converged(x_pre, f_pre, 0));
    }
    if f_cur == 0.0 {
        return Ok(converged(x_cur, f_cur, 0));
    }
    if f_pre.is_sign_negative() == f_cur.is_sign_negative() {
        return Err(Error::SameSign {
            lo,
            hi,
            f_lo: f_pre,
            f_hi: f_cur,
        });
    }

    let mut x_blk = 0.0;
    let mut f_blk = 0.0;
    let mut s_pre = 0.0;
    let mut s_cur = 0.0;

    for iter in 1..=config.max_iters {
        if f_pre != 0.0 && f_cur != 0.0 && f_pre.is_sign_negative() != f_cur.is_sign_negative() {
            x_blk = x_pre;
            f_blk = f_pre;
            s_pre = x_cur - x_pre;
            s_cur = s_pre;
        }

        // Keep the best estimate in `x_cur`.
        if f_blk.abs() < f_cur.abs() {
            x_pre = x_cur;
            x_cur = x_blk;
            x_blk = x_pre;
            f_pre = f_cur;
            f_cur = f_blk;
            f_blk = f_pre;
        }

        let delta = 0.5 * (config.x_abs_tol + config.x_rel_tol * x_cur.abs());
        let s_bis = 0.5 * (x_blk - x_cur);

        if f_cur == 0.0 || s_bis.abs() < delta {
            return Ok(converged(x_cur, f_cur, iter));
        }

        if s_pre.abs() > delta && f_cur.abs() < f_pre.abs() {
            let s_try = if x_pre == x_blk {
                // secant
                -f_cur * (x_cur - x_pre) / (f_cur - f_pre)
            } else {
                // inverse quadratic
                let d_pre = (f_pre - f_cur) / (x_pre - x_cur);
                let d_blk = (f_blk - f_cur) / (x_blk - x_cur);
                -f_cur * (f_blk * d_blk - f_pre * d_pre) / (d_blk * d_pre * (f_blk - f_pre))
            };

            if 2.0 * s_try.abs() < s_pre.abs().min(3.0 * s_bis.abs() - delta) {
                s_pre = s_cur;
                s_cur = s_try;
            } else {
                s_pre = s_bis;
                s_cur = s_bis;
            }
        } else {
            s_pre = s_bis;
            s_cur = s_bis;
        }

        x_pre = x_cur;
        f_pre = f_cur;
        if s_cur.abs() > delta {
            x_cur += s_cur;
        } else {
            x_cur += delta.copysign(s_bis);
        }

        f_cur = eval(x_cur)?;
    }

    Ok(Solution {
        x: x_cur,
        residual: f_cur,
        iters: config.max_iters,
        status: Status::MaxIters,
    })
}

fn converged(x: f64, residual: f64, iters: usize) -> Solution {
    Solution {
        x,
        residual,
        iters,
        status: Status::Converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;

    fn ok(f: impl Fn(f64) -> f64) -> impl FnMut(f64) -> Result<f64, Infallible> {
        move |x| Ok(f(x))
    }

    #[test]
    fn finds_sqrt_two() {
        let solution = solve(ok(|x| x * x - 2.0), [0.0, 2.0], &Config::default()).unwrap();

        assert_eq!(solution.status, Status::Converged);
        assert_relative_eq!(solution.x, 2.0_f64.sqrt(), epsilon = 1e-11);
        assert!(solution.iters < 15);
    }

    #[test]
    fn handles_reversed_bracket() {
        let solution = solve(ok(|x| x.cos() - x), [1.0, 0.0], &Config::default()).unwrap();
        assert_relative_eq!(solution.x, 0.739_085_133_215_160_6, epsilon = 1e-11);
    }

    #[test]
    fn respects_loose_tolerance() {
        let config = Config {
            x_abs_tol: 0.01,
            ..Config::default()
        };
        let solution = solve(ok(|x| x.powi(4) - 300.0_f64.powi(4)), [213.15, 393.15], &config)
            .unwrap();
        assert!((solution.x - 300.0).abs() < 0.01);
    }

    #[test]
    fn returns_zero_endpoint() {
        let solution = solve(ok(|x| x - 1.0), [1.0, 5.0], &Config::default()).unwrap();
        assert_eq!(solution.x, 1.0);
        assert_eq!(solution.iters, 0);
    }

    #[test]
    fn rejects_same_sign() {
        let err = solve(ok(|x| x * x + 1.0), [-1.0, 1.0], &Config::default()).unwrap_err();
        assert!(matches!(err, Error::SameSign { f_lo, f_hi, .. } if f_lo == 2.0 && f_hi == 2.0));
    }

    #[test]
    fn rejects_invalid_bracket() {
        let err = solve(ok(|x| x), [f64::NAN, 1.0], &Config::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidBracket));
    }

    #[test]
    fn propagates_evaluation_errors() {
        let err = solve(
            |x: f64| if x > 0.5 { Err("boom") } else { Ok(x - 0.7) },
            [0.0, 1.0],
            &Config::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Eval { x, source: "boom" } if x == 1.0));
    }

    #[test]
    fn reports_iteration_limit() {
        let config = Config {
            max_iters: 2,
            x_abs_tol: 1e-15,
            x_rel_tol: 0.0,
        };
        let solution = solve(ok(|x| x.powi(3) - 0.3), [-10.0, 10.0], &config).unwrap();
        assert_eq!(solution.status, Status::MaxIters);
        assert_eq!(solution.iters, 2);
    }
}
