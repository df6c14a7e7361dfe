//! Unit conversions and basic meteorological derivations.

use ndarray::{Array3, Zip};
use uom::si::{
    angle::radian,
    f64::{Pressure, ThermodynamicTemperature, Velocity},
    pressure::kilopascal,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::support::{air, grid::FieldMeta, units::kelvin_to_celsius};

use super::{Context, Generator, GeneratorError, GeneratorRegistry};

pub(super) fn register(registry: &mut GeneratorRegistry) {
    for (celsius, source, long_name) in [
        ("t2mC", "t2m", "2 metre temperature"),
        ("d2mC", "d2m", "2 metre dewpoint temperature"),
        ("sktC", "skt", "Skin temperature"),
    ] {
        registry.register(
            Generator::new(celsius, move |ctx| {
                let values = ctx.values(source)?.mapv(kelvin_to_celsius);
                ctx.insert(celsius, values, FieldMeta::new("deg C", long_name))
            })
            .provides(&[celsius])
            .requires(&[source]),
        );
    }

    registry
        .register(
            Generator::new("ws10", wind_speed)
                .provides(&["ws10"])
                .requires(&["u10", "v10"]),
        )
        .register(
            Generator::new("wdir10", wind_direction)
                .provides(&["wdir10"])
                .requires(&["u10", "v10"]),
        )
        .register(
            Generator::new("dewpoint", dewpoint)
                .provides(&["d2m"])
                .requires(&["e_kPa"]),
        )
        .register(
            Generator::new("vapor_pressure_from_dewpoint", vapor_pressure_from_dewpoint)
                .provides(&["e_kPa"])
                .requires(&["d2m"]),
        )
        .register(
            Generator::new("vapor_pressure_from_humidity", vapor_pressure_from_humidity)
                .provides(&["e_kPa"])
                .requires(&["rh", "t2m"]),
        )
        .register(
            Generator::new("relative_humidity", relative_humidity)
                .provides(&["rh"])
                .requires(&["e_kPa", "t2m"]),
        );

    for (kpa, source, long_name) in [
        ("msl_kPa", "msl", "Mean sea level pressure"),
        ("sp_kPa", "sp", "Surface pressure"),
    ] {
        registry.register(
            Generator::new(kpa, move |ctx| {
                let values = ctx.values(source)? / 1000.0;
                ctx.insert(kpa, values, FieldMeta::new("kPa", long_name))
            })
            .provides(&[kpa])
            .requires(&[source]),
        );
    }
}

fn temperature(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<kelvin>(value)
}

fn pressure(value: f64) -> Pressure {
    Pressure::new::<kilopascal>(value)
}

fn zip_map(a: &Array3<f64>, b: &Array3<f64>, f: impl Fn(f64, f64) -> f64) -> Array3<f64> {
    Zip::from(a).and(b).map_collect(|&x, &y| f(x, y))
}

fn wind_speed(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let values = zip_map(ctx.values("u10")?, ctx.values("v10")?, |u, v| {
        air::wind_speed(
            Velocity::new::<meter_per_second>(u),
            Velocity::new::<meter_per_second>(v),
        )
        .get::<meter_per_second>()
    });
    ctx.insert(
        "ws10",
        values,
        FieldMeta::new("m s**-1", "Wind speed at 10 metre"),
    )
}

fn wind_direction(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let values = zip_map(ctx.values("u10")?, ctx.values("v10")?, |u, v| {
        air::wind_direction(
            Velocity::new::<meter_per_second>(u),
            Velocity::new::<meter_per_second>(v),
        )
        .get::<radian>()
    });
    ctx.insert(
        "wdir10",
        values,
        FieldMeta::new("rad", "Wind direction at 10 metre"),
    )
}

fn dewpoint(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let values = ctx
        .values("e_kPa")?
        .mapv(|e| air::dewpoint(pressure(e)).get::<kelvin>());
    ctx.insert("d2m", values, FieldMeta::new("K", "Dew point"))
}

fn vapor_pressure_from_dewpoint(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let values = ctx
        .values("d2m")?
        .mapv(|d| air::saturated_vapor_pressure(temperature(d)).get::<kilopascal>());
    ctx.insert("e_kPa", values, FieldMeta::new("kPa", "Vapor pressure"))
}

fn vapor_pressure_from_humidity(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let values = zip_map(ctx.values("rh")?, ctx.values("t2m")?, |rh, t| {
        air::vapor_pressure(rh, temperature(t)).get::<kilopascal>()
    });
    ctx.insert("e_kPa", values, FieldMeta::new("kPa", "Vapor pressure"))
}

fn relative_humidity(ctx: &mut Context<'_>) -> Result<(), GeneratorError> {
    let values = zip_map(ctx.values("e_kPa")?, ctx.values("t2m")?, |e, t| {
        air::relative_humidity(pressure(e), temperature(t))
    });
    ctx.insert("rh", values, FieldMeta::new("1", "Relative humidity"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::{
        generators::{Options, Resolution},
        grid::test_support::constant_dataset,
    };

    #[test]
    fn celsius_and_pressure_conversions() {
        let registry = GeneratorRegistry::with_defaults();
        let mut data = constant_dataset(&[("t2m", 300.0), ("msl", 101_300.0)]);
        let options = Options::new();

        registry.resolve(&mut data, &options, "t2mC").unwrap();
        registry.resolve(&mut data, &options, "msl_kPa").unwrap();

        assert_relative_eq!(data.values("t2mC").unwrap()[[0, 0, 0]], 26.85, epsilon = 1e-12);
        assert_relative_eq!(data.values("msl_kPa").unwrap()[[1, 2, 1]], 101.3, epsilon = 1e-12);
        assert_eq!(data.get("t2mC").unwrap().meta.units, "deg C");
    }

    #[test]
    fn wind_from_components() {
        let registry = GeneratorRegistry::with_defaults();
        let mut data = constant_dataset(&[("u10", 3.0), ("v10", 4.0)]);

        registry.resolve(&mut data, &Options::new(), "ws10").unwrap();
        registry.resolve(&mut data, &Options::new(), "wdir10").unwrap();

        assert_relative_eq!(data.values("ws10").unwrap()[[0, 1, 1]], 5.0);
        // Blowing toward the north-east, so coming from the south-west.
        let wdir = data.values("wdir10").unwrap()[[0, 1, 1]].to_degrees();
        assert_relative_eq!(wdir, 180.0 + 36.869_897_645_844_02, epsilon = 1e-9);
    }

    #[test]
    fn humidity_round_trip_through_vapor_pressure() {
        let registry = GeneratorRegistry::with_defaults();
        let mut data = constant_dataset(&[("t2m", 300.0), ("d2m", 290.0)]);
        let options = Options::new();

        // d2m is preferred over rh for e_kPa, and rh then follows from e_kPa.
        registry.resolve(&mut data, &options, "e_kPa").unwrap();
        registry.resolve(&mut data, &options, "rh").unwrap();

        let e = data.values("e_kPa").unwrap()[[0, 0, 0]];
        let rh = data.values("rh").unwrap()[[0, 0, 0]];
        assert_relative_eq!(e, 1.9183, epsilon = 1e-3);
        assert!(rh > 0.5 && rh < 0.6);

        data.remove("d2m");
        assert_eq!(
            registry.resolve(&mut data, &options, "d2m").unwrap(),
            Resolution::Generated {
                generator: "dewpoint".into()
            }
        );
        assert_relative_eq!(data.values("d2m").unwrap()[[0, 0, 0]], 290.0, epsilon = 1e-9);
    }

    #[test]
    fn vapor_pressure_from_humidity_when_no_dewpoint() {
        let registry = GeneratorRegistry::with_defaults();
        let mut data = constant_dataset(&[("t2m", 300.0), ("rh", 0.5)]);

        let resolution = registry.resolve(&mut data, &Options::new(), "e_kPa").unwrap();

        assert_eq!(
            resolution,
            Resolution::Generated {
                generator: "vapor_pressure_from_humidity".into()
            }
        );
        let expected = 0.5 * air::saturated_vapor_pressure(temperature(300.0)).get::<kilopascal>();
        assert_relative_eq!(data.values("e_kPa").unwrap()[[0, 0, 0]], expected, epsilon = 1e-12);
    }
}
