use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// # Examples
///
/// ```
/// use tci_models::support::constraint::StrictlyPositive;
///
/// assert!(StrictlyPositive::new(0.01).is_ok());
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Constrained<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{
        f64::{Length, TemperatureInterval},
        length::meter,
        temperature_interval::kelvin,
    };

    #[test]
    fn solver_tolerances() {
        assert!(StrictlyPositive::new(TemperatureInterval::new::<kelvin>(0.01)).is_ok());
        assert_eq!(
            StrictlyPositive::new(TemperatureInterval::new::<kelvin>(0.0)),
            Err(ConstraintError::Zero)
        );
        assert_eq!(
            StrictlyPositive::new(TemperatureInterval::new::<kelvin>(-0.1)),
            Err(ConstraintError::Negative)
        );
    }

    #[test]
    fn heights() {
        assert!(StrictlyPositive::new(Length::new::<meter>(2.0)).is_ok());
        assert_eq!(
            StrictlyPositive::new(Length::new::<meter>(f64::NAN)),
            Err(ConstraintError::NotANumber)
        );
    }
}
