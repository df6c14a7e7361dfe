use uom::si::{
    angle::degree,
    f64::{Angle, Length, Velocity},
    length::meter,
    velocity::meter_per_second,
};

/// Height of the standard anemometer wind (10 m).
pub const REFERENCE_HEIGHT_M: f64 = 10.0;

/// Scales a 10 m wind speed to another height with a logarithmic profile.
///
/// `roughness_length` is the aerodynamic surface roughness (for example the
/// forecast surface roughness of a weather model). Heights at or below the
/// roughness length give a non-positive or undefined speed, which callers are
/// expected to floor.
#[must_use]
pub fn wind_at_height(
    reference_speed: Velocity,
    roughness_length: Length,
    target_height: Length,
) -> Velocity {
    let z0 = roughness_length.get::<meter>();
    let z = target_height.get::<meter>();
    reference_speed * ((z / z0).ln() / (REFERENCE_HEIGHT_M / z0).ln())
}

/// Wind speed from eastward (`u`) and northward (`v`) components.
#[must_use]
pub fn wind_speed(u: Velocity, v: Velocity) -> Velocity {
    Velocity::new::<meter_per_second>(
        u.get::<meter_per_second>().hypot(v.get::<meter_per_second>()),
    )
}

/// Meteorological wind direction (the direction the wind blows from).
///
/// Returned in `[0°, 360°]`, clockwise from north.
#[must_use]
pub fn wind_direction(u: Velocity, v: Velocity) -> Angle {
    let toward = u
        .get::<meter_per_second>()
        .atan2(v.get::<meter_per_second>())
        .to_degrees();
    Angle::new::<degree>(180.0 + toward)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn ms(value: f64) -> Velocity {
        Velocity::new::<meter_per_second>(value)
    }

    #[test]
    fn log_profile_is_identity_at_reference_height() {
        let ws = wind_at_height(ms(5.0), Length::new::<meter>(0.1), Length::new::<meter>(10.0));
        assert_relative_eq!(ws.get::<meter_per_second>(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn log_profile_slows_near_the_ground() {
        let ws = wind_at_height(ms(5.0), Length::new::<meter>(0.1), Length::new::<meter>(2.0));
        // ln(20) / ln(100)
        assert_relative_eq!(ws.get::<meter_per_second>(), 3.2526, epsilon = 1e-4);
    }

    #[test]
    fn components() {
        assert_relative_eq!(wind_speed(ms(3.0), ms(4.0)).get::<meter_per_second>(), 5.0);

        // Wind blowing toward the north comes from the south.
        assert_relative_eq!(wind_direction(ms(0.0), ms(1.0)).get::<degree>(), 180.0);
        // Wind blowing toward the east comes from the west.
        assert_relative_eq!(wind_direction(ms(1.0), ms(0.0)).get::<degree>(), 270.0);
    }
}
