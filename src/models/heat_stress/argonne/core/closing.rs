//! Closing corrections applied after the root search.

use uom::si::{
    f64::{Length, ThermodynamicTemperature, Velocity},
    length::meter,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::support::units::TemperatureDifference;

/// Converts a globe temperature to that of the ISO 7243 standard globe.
///
/// `diameter` is the diameter of the globe the temperature was computed for.
pub(crate) fn standard_globe(
    globe: ThermodynamicTemperature,
    air: ThermodynamicTemperature,
    wind_speed: Velocity,
    diameter: Length,
) -> ThermodynamicTemperature {
    let v = wind_speed.get::<meter_per_second>().powf(0.6);
    let d = diameter.get::<meter>();
    let factor = (1.0 + 1.13 * v * d.powf(-0.4)) / (1.0 + 2.41 * v);
    air + globe.minus(air) * factor
}

/// Outdoor WBGT, `0.1·Ta + 0.2·Tg + 0.7·Tnw`.
pub(crate) fn wbgt(
    air: ThermodynamicTemperature,
    globe: ThermodynamicTemperature,
    wet_bulb: ThermodynamicTemperature,
) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<kelvin>(
        0.1 * air.get::<kelvin>() + 0.2 * globe.get::<kelvin>() + 0.7 * wet_bulb.get::<kelvin>(),
    )
}
