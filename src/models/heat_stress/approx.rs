//! Empirical WBGT approximations.
//!
//! Each index is a closed-form regression on routinely observed quantities.
//! They need no radiation data, at the cost of ignoring the actual sun and
//! wind. Results are in °C, matching how the regressions were published.

use ndarray::{Array3, Zip};
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::kilopascal,
    thermodynamic_temperature::degree_celsius,
};

use crate::{
    support::{
        air::magnus_vapor_pressure_hpa,
        generators::Options,
        grid::{Dataset, FieldMeta},
    },
    tool::{Calculator, CalculatorError},
};

/// ACSM (1984) WBGT from air temperature and dewpoint.
///
/// `0.567·T + 0.393·e + 3.94` with `T` in °C and the Magnus vapor pressure
/// `e` in hPa.
#[must_use]
pub fn acsm(air: ThermodynamicTemperature, dewpoint: ThermodynamicTemperature) -> ThermodynamicTemperature {
    let t = air.get::<degree_celsius>();
    let e = magnus_vapor_pressure_hpa(dewpoint.get::<degree_celsius>());
    celsius(0.567 * t + 0.393 * e + 3.94)
}

/// Bernard & Barrow (2013) WBGT.
///
/// `1.1 + 0.66·T + 2.9·e − 1.8` in direct sun, without the last term
/// otherwise; `T` in °C and `e` in kPa.
#[must_use]
pub fn bernard(
    air: ThermodynamicTemperature,
    vapor_pressure: Pressure,
    direct_sun: bool,
) -> ThermodynamicTemperature {
    let sun = if direct_sun { -1.8 } else { 0.0 };
    celsius(1.1 + 0.66 * air.get::<degree_celsius>() + 2.9 * vapor_pressure.get::<kilopascal>() + sun)
}

/// Dimiceli et al. (2013) WBGT from air temperature and relative humidity
/// (fraction).
#[must_use]
pub fn dimiceli(air: ThermodynamicTemperature, relative_humidity: f64) -> ThermodynamicTemperature {
    let t = air.get::<degree_celsius>();
    let r = 100.0 * relative_humidity;
    celsius(
        -5.806 + 0.672 * t - 0.006 * t.powi(2) + 0.061 * r + 0.004 * r * t
            + 9.9e-5 * r * t.powi(2)
            - 3.3e-5 * r.powi(2)
            - 5e-6 * r.powi(2) * t
            - 1e-7 * r.powi(2) * t.powi(2),
    )
}

fn celsius(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(value)
}

/// Returns a copy of `data` with a `wbgt` field in °C.
fn with_wbgt(
    data: &Dataset,
    values: Array3<f64>,
    method: &str,
) -> Result<Dataset, CalculatorError> {
    let mut work = data.clone();
    let meta = FieldMeta::new("deg C", format!("Wet Bulb Globe Temperature ({method})"))
        .with_attr("method", method);
    work.insert("wbgt", values, meta)?;
    Ok(work)
}

/// WBGT by the ACSM approximation, exported as `wbgt_acsm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcsmCalculator;

impl Calculator for AcsmCalculator {
    fn name(&self) -> &str {
        "acsm"
    }

    fn required_fields(&self) -> &[&'static str] {
        &["t2mC", "d2mC"]
    }

    fn execute(&self, data: &Dataset, _options: &Options) -> Result<Dataset, CalculatorError> {
        let values = Zip::from(data.values("t2mC")?)
            .and(data.values("d2mC")?)
            .map_collect(|&t, &d| acsm(celsius(t), celsius(d)).get::<degree_celsius>());
        with_wbgt(data, values, "ACSM")
    }

    fn exports(&self) -> &[(&'static str, &'static str)] {
        &[("wbgt", "wbgt_acsm")]
    }
}

/// WBGT by the Bernard & Barrow approximation, exported as `wbgt_bernard`.
///
/// A cell is in direct sun when its solar zenith angle is below 90°.
#[derive(Debug, Clone, Copy, Default)]
pub struct BernardCalculator;

impl Calculator for BernardCalculator {
    fn name(&self) -> &str {
        "bernard"
    }

    fn required_fields(&self) -> &[&'static str] {
        &["t2mC", "e_kPa", "solza"]
    }

    fn execute(&self, data: &Dataset, _options: &Options) -> Result<Dataset, CalculatorError> {
        let values = Zip::from(data.values("t2mC")?)
            .and(data.values("e_kPa")?)
            .and(data.values("solza")?)
            .map_collect(|&t, &e, &zenith| {
                let sun = zenith < std::f64::consts::FRAC_PI_2;
                bernard(celsius(t), Pressure::new::<kilopascal>(e), sun).get::<degree_celsius>()
            });
        with_wbgt(data, values, "Bernard & Barrow")
    }

    fn exports(&self) -> &[(&'static str, &'static str)] {
        &[("wbgt", "wbgt_bernard")]
    }
}

/// WBGT by the Dimiceli approximation, exported as `wbgt_dimiceli`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimiceliCalculator;

impl Calculator for DimiceliCalculator {
    fn name(&self) -> &str {
        "dimiceli"
    }

    fn required_fields(&self) -> &[&'static str] {
        &["t2mC", "rh"]
    }

    fn execute(&self, data: &Dataset, _options: &Options) -> Result<Dataset, CalculatorError> {
        let values = Zip::from(data.values("t2mC")?)
            .and(data.values("rh")?)
            .map_collect(|&t, &rh| dimiceli(celsius(t), rh).get::<degree_celsius>());
        with_wbgt(data, values, "Dimiceli")
    }

    fn exports(&self) -> &[(&'static str, &'static str)] {
        &[("wbgt", "wbgt_dimiceli")]
    }
}
