use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

/// Extension trait for computing temperature differences.
///
/// `uom` does not allow subtracting two [`ThermodynamicTemperature`] values
/// directly, so this trait provides [`minus`](Self::minus), which returns a
/// [`TemperatureInterval`].
///
/// See [#380](https://github.com/iliekturtles/uom/issues/380) for background.
pub trait TemperatureDifference {
    /// Returns the temperature difference `self - other`.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureDifference for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        temperature_interval::degree_celsius as delta_celsius,
        thermodynamic_temperature::degree_celsius,
    };

    #[test]
    fn globe_excess_over_air() {
        let air = ThermodynamicTemperature::new::<degree_celsius>(27.0);
        let globe = ThermodynamicTemperature::new::<abs_kelvin>(320.15);

        assert_relative_eq!(globe.minus(air).get::<delta_celsius>(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(air.minus(globe).get::<delta_kelvin>(), -20.0, epsilon = 1e-12);
    }
}
