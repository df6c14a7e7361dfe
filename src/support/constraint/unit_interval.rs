use num_traits::{One, Zero};

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value lies in the closed unit interval `[0, 1]`.
///
/// Cosines of solar zenith angles used as day/night thresholds are the main
/// users of this constraint.
///
/// # Examples
///
/// ```
/// use tci_models::support::constraint::UnitInterval;
///
/// assert!(UnitInterval::new(0.0436).is_ok());
/// assert!(UnitInterval::new(1.0).is_ok());
/// assert!(UnitInterval::new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs a [`Constrained<T, UnitInterval>`] if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `[0, 1]` or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero + One>(
        value: T,
    ) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::<T, UnitInterval>::new(value)
    }
}

impl<T: PartialOrd + Zero + One> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        if value.partial_cmp(&T::zero()).is_none() {
            return Err(ConstraintError::NotANumber);
        }
        if *value < T::zero() {
            return Err(ConstraintError::BelowMinimum);
        }
        if *value > T::one() {
            return Err(ConstraintError::AboveMaximum);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_thresholds() {
        let cza_min = 87.5_f64.to_radians().cos();
        assert!(UnitInterval::new(cza_min).is_ok());
        assert!(UnitInterval::new(0.0).is_ok());
        assert_eq!(UnitInterval::new(-0.1), Err(ConstraintError::BelowMinimum));
        assert_eq!(UnitInterval::new(1.5), Err(ConstraintError::AboveMaximum));
        assert_eq!(UnitInterval::new(f64::NAN), Err(ConstraintError::NotANumber));
    }
}
