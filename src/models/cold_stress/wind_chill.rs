//! JAG/TI wind-chill equivalent temperature.

use ndarray::Zip;
use uom::si::{
    f64::{ThermodynamicTemperature, Velocity},
    thermodynamic_temperature::degree_celsius,
    velocity::{kilometer_per_hour, meter_per_second},
};

use crate::{
    support::{
        generators::Options,
        grid::{Dataset, FieldMeta},
    },
    tool::{Calculator, CalculatorError},
};

/// Wind-chill equivalent temperature (JAG/TI, 2001).
///
/// `13.12 + 0.6215·T − 11.37·V^0.16 + 0.3965·T·V^0.16` with `T` in °C and the
/// 10 m wind `V` in km/h.
#[must_use]
pub fn wind_chill(air: ThermodynamicTemperature, wind_speed: Velocity) -> ThermodynamicTemperature {
    let t = air.get::<degree_celsius>();
    let v = wind_speed.get::<kilometer_per_hour>().powf(0.16);
    ThermodynamicTemperature::new::<degree_celsius>(13.12 + 0.6215 * t - 11.37 * v + 0.3965 * t * v)
}

/// Wind chill over a dataset, exported as `wcet_jagti`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindChillCalculator;

impl Calculator for WindChillCalculator {
    fn name(&self) -> &str {
        "windchill"
    }

    fn required_fields(&self) -> &[&'static str] {
        &["t2mC", "ws10"]
    }

    fn execute(&self, data: &Dataset, _options: &Options) -> Result<Dataset, CalculatorError> {
        let values = Zip::from(data.values("t2mC")?)
            .and(data.values("ws10")?)
            .map_collect(|&t, &ws| {
                wind_chill(
                    ThermodynamicTemperature::new::<degree_celsius>(t),
                    Velocity::new::<meter_per_second>(ws),
                )
                .get::<degree_celsius>()
            });

        let mut work = data.clone();
        work.insert(
            "wcet",
            values,
            FieldMeta::new("deg C", "Wind Chill Equivalent Temperature (JAG/TI)"),
        )?;
        Ok(work)
    }

    fn exports(&self) -> &[(&'static str, &'static str)] {
        &[("wcet", "wcet_jagti")]
    }
}
