//! Extensions to [`uom`] and unit helpers for plain gridded fields.
//!
//! Model internals use [`uom`] quantities. Gridded fields are stored as plain
//! `f64` arrays tagged with unit strings, so this module also carries the
//! small scale conversions those fields need.
//!
//! ## Temperature differences
//!
//! The [`TemperatureDifference`] trait provides a [`minus`](TemperatureDifference::minus) method
//! for subtracting one absolute temperature from another to get a temperature interval:
//!
//! ```
//! use uom::si::f64::ThermodynamicTemperature;
//! use uom::si::thermodynamic_temperature::kelvin;
//! use tci_models::support::units::TemperatureDifference;
//!
//! let globe = ThermodynamicTemperature::new::<kelvin>(320.0);
//! let air = ThermodynamicTemperature::new::<kelvin>(300.0);
//! let excess = globe.minus(air);
//! // excess is a TemperatureInterval, not a ThermodynamicTemperature
//! ```

mod quantities;
mod temperature_difference;

pub use quantities::SpecificGasConstant;
pub use temperature_difference::TemperatureDifference;

/// Kelvin value of 0 °C.
pub const ZERO_CELSIUS: f64 = 273.15;

/// Converts a temperature in kelvin to degrees Celsius.
#[must_use]
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - ZERO_CELSIUS
}

/// Converts a temperature in degrees Celsius to kelvin.
#[must_use]
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + ZERO_CELSIUS
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn celsius_kelvin_scales() {
        assert_relative_eq!(kelvin_to_celsius(300.0), 26.85, epsilon = 1e-12);
        assert_relative_eq!(celsius_to_kelvin(-60.0), 213.15, epsilon = 1e-12);
        assert!(kelvin_to_celsius(f64::NAN).is_nan());
    }
}
