//! Sign checks and residual scans over a bracket.

/// Sign of a residual value.
///
/// Zero is its own sign, so a bracket whose ends are both exactly zero does
/// not count as a sign change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    /// Returns the sign of `value`, or `None` if it is not finite.
    #[must_use]
    pub fn of(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Zero
        })
    }
}

/// Returns `true` if residuals at the two bracket ends differ in sign.
///
/// Non-finite residuals never straddle.
#[must_use]
pub fn straddles(f_lo: f64, f_hi: f64) -> bool {
    match (Sign::of(f_lo), Sign::of(f_hi)) {
        (Some(lo), Some(hi)) => lo != hi,
        _ => false,
    }
}

/// Evaluates `f` at `lo`, `lo + step`, ... up to and including `hi`.
///
/// Points are computed as `lo + i * step` so rounding does not accumulate.
/// An inverted bracket or a non-positive step yields an empty scan.
pub fn scan<F>(mut f: F, lo: f64, hi: f64, step: f64) -> Vec<(f64, f64)>
where
    F: FnMut(f64) -> f64,
{
    let valid = step > 0.0 && hi >= lo && (hi - lo).is_finite();
    if !valid {
        return Vec::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = ((hi - lo) / step + 1e-9).floor() as usize;

    (0..=count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = lo + i as f64 * step;
            (x, f(x))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn sign_change_detection() {
        assert!(straddles(-1.0, 2.0));
        assert!(straddles(3.0, -0.5));
        assert!(!straddles(1.0, 2.0));
        assert!(!straddles(-1.0, -2.0));
    }

    #[test]
    fn zero_is_its_own_sign() {
        assert!(straddles(0.0, 1.0));
        assert!(straddles(-1.0, 0.0));
        assert!(!straddles(0.0, 0.0));
    }

    #[test]
    fn non_finite_never_straddles() {
        assert!(!straddles(f64::NAN, 1.0));
        assert!(!straddles(-1.0, f64::INFINITY));
        assert_eq!(Sign::of(f64::NAN), None);
    }

    #[test]
    fn scan_includes_both_ends() {
        let points = scan(|x| x * 2.0, 213.15, 393.15, 10.0);

        assert_eq!(points.len(), 19);
        assert_relative_eq!(points[0].0, 213.15);
        assert_relative_eq!(points[18].0, 393.15, epsilon = 1e-9);
        assert_relative_eq!(points[18].1, 786.3, epsilon = 1e-9);
    }

    #[test]
    fn scan_rejects_bad_input() {
        assert!(scan(|x| x, 1.0, 0.0, 1.0).is_empty());
        assert!(scan(|x| x, 0.0, 1.0, 0.0).is_empty());
    }
}
