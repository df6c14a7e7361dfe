use std::f64::consts::FRAC_PI_2;

use ndarray::Zip;
use tracing::{debug, warn};
use uom::si::{
    f64::{Length, ThermodynamicTemperature, Velocity},
    length::meter,
    thermodynamic_temperature::kelvin,
    velocity::meter_per_second,
};

use crate::{
    support::{
        air::wind_at_height,
        generators::{Options, option},
        grid::{Dataset, FieldMeta},
    },
    tool::{Calculator, CalculatorError},
};

use super::{
    ArgonneModel, Execution, SolveError,
    core::{ParamFields, SolvedGrid, solve_grid, standard_globe, wbgt},
};

/// Zenith angles above this, in radians, are treated as exactly 90°.
const MAX_ZENITH: f64 = 1.570_796_15;

const REQUIRED: [&str; 11] = [
    "t2m", "skt", "e_kPa", "rh", "msl_kPa", "ws10", "fsr", "Isw_in", "Ibeam", "solza", "fal",
];

const EXPORTS: [(&str, &str); 3] = [
    ("wbgt", "wbgt_argonne"),
    ("tg", "tg_argonne"),
    ("tnw", "tnw_argonne"),
];

/// Runs the [`ArgonneModel`] over every cell of a dataset.
///
/// Before solving, the cell parameters are derived from the dataset fields:
/// the 10 m wind is scaled to the sensor height with the surface roughness
/// `fsr` and floored, irradiance is zeroed at night, and the direct fraction
/// is `Ibeam / Isw_in` capped at 0.9. After solving, the globe temperature is
/// corrected to the standard globe and combined into the WBGT.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArgonneCalculator {
    pub model: ArgonneModel,
    pub execution: Execution,
}

impl ArgonneCalculator {
    #[must_use]
    pub fn new(model: ArgonneModel, execution: Execution) -> Self {
        Self { model, execution }
    }

    /// Adds the ten parameter fields to `work`.
    fn preface(&self, work: &mut Dataset, options: &Options) -> Result<(), CalculatorError> {
        let hyper = &self.model.hyperparameters;
        let floor = options.number_or(
            option::WINDSPEED_LOWLIMIT,
            hyper.min_wind_speed.as_ref().get::<meter_per_second>(),
        )?;
        let height = *hyper.wind_height.as_ref();
        let night_cza = hyper.night_cza.into_inner();

        let ws = Zip::from(work.values("ws10")?)
            .and(work.values("fsr")?)
            .map_collect(|&ws10, &fsr| {
                let ws = wind_at_height(
                    Velocity::new::<meter_per_second>(ws10),
                    Length::new::<meter>(fsr),
                    height,
                )
                .get::<meter_per_second>();
                if ws.is_nan() { ws } else { ws.max(floor) }
            });

        let solcza = work
            .values("solza")?
            .mapv(|z| (if z > MAX_ZENITH { FRAC_PI_2 } else { z }).cos());

        let isw = Zip::from(work.values("Isw_in")?)
            .and(&solcza)
            .map_collect(|&isw, &cza| if cza <= night_cza { 0.0 } else { isw });

        let frac = Zip::from(work.values("Ibeam")?)
            .and(&isw)
            .map_collect(|&beam, &isw| {
                if isw < 1.0 {
                    0.0
                } else {
                    (beam / isw).clamp(0.0, 0.9)
                }
            });

        let pressure = work.values("msl_kPa")?.clone();

        work.insert("P_kPa", pressure, FieldMeta::new("kPa", "air pressure"))?;
        work.insert("ws", ws, FieldMeta::new("m/s", "wind speed at sensor height"))?;
        work.insert("solcza", solcza, FieldMeta::new("1", "cosine of solar zenith angle"))?;
        work.insert("Isw_in", isw, FieldMeta::new("W/m2", "incoming shortwave irradiance"))?;
        work.insert("Isw_frac", frac, FieldMeta::new("1", "direct fraction of irradiance"))?;
        Ok(())
    }

    fn solve(&self, work: &Dataset) -> Result<SolvedGrid, CalculatorError> {
        let fields = ParamFields::new(work)?;
        let solved = solve_grid(
            &fields,
            self.execution,
            |params| {
                self.model.solve_cell(params).inspect_err(|err| {
                    if let SolveError::NoRoot(diagnostic) = err {
                        warn!(%diagnostic, "no root in bracket");
                    }
                })
            },
            |progress| {
                debug!(
                    chunk = progress.chunk + 1,
                    chunks = progress.chunks,
                    cells_done = progress.cells_done,
                    cells = progress.cells,
                    "argonne progress"
                );
            },
        )?;
        Ok(solved)
    }

    /// Adds `tg_raw`, `tg`, `tnw` and `wbgt` to `work`.
    fn closing(&self, work: &mut Dataset, solved: SolvedGrid) -> Result<(), CalculatorError> {
        let diameter = self.model.constants.globe.diameter;
        let t2m = work.values("t2m")?;

        let tg = Zip::from(&solved.globe)
            .and(t2m)
            .and(work.values("ws")?)
            .map_collect(|&tg, &ta, &ws| {
                standard_globe(k(tg), k(ta), Velocity::new::<meter_per_second>(ws), diameter)
                    .get::<kelvin>()
            });

        let index = Zip::from(t2m)
            .and(&tg)
            .and(&solved.wet_bulb)
            .map_collect(|&ta, &tg, &tnw| wbgt(k(ta), k(tg), k(tnw)).get::<kelvin>());

        work.insert("tg_raw", solved.globe, meta("globe temperature"))?;
        work.insert("tg", tg, meta("standard globe temperature"))?;
        work.insert("tnw", solved.wet_bulb, meta("natural wet-bulb temperature"))?;
        work.insert("wbgt", index, meta("wet bulb globe temperature"))?;
        Ok(())
    }
}

fn k(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<kelvin>(value)
}

fn meta(long_name: &str) -> FieldMeta {
    FieldMeta::new("K", long_name).with_attr("method", "Liljegren")
}

impl Calculator for ArgonneCalculator {
    fn name(&self) -> &str {
        "argonne"
    }

    fn required_fields(&self) -> &[&'static str] {
        &REQUIRED
    }

    fn execute(&self, data: &Dataset, options: &Options) -> Result<Dataset, CalculatorError> {
        let mut work = data.clone();
        self.preface(&mut work, options)?;
        let solved = self.solve(&work)?;
        self.closing(&mut work, solved)?;
        Ok(work)
    }

    fn exports(&self) -> &[(&'static str, &'static str)] {
        &EXPORTS
    }
}
