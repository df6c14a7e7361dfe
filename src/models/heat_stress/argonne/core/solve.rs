//! Per-cell root search for the globe and natural wet-bulb temperatures.

mod error;

pub use error::{NoRootDiagnostic, SolveError};

use std::fmt;

use twine_solvers::equation::bisection;
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

use crate::support::root::{brent, scan, straddles};

use super::{
    balance::HeatBalance,
    config::{Hyperparameters, RootMethod},
    constants::Constants,
    params::CellParams,
    residual::{NonFiniteResidual, ResidualModel, ZeroResidual},
};

/// Step of the residual scan reported in a [`NoRootDiagnostic`], in K.
const SCAN_STEP: f64 = 10.0;

/// Temperature the solver is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unknown {
    /// Globe temperature.
    Globe,

    /// Natural wet-bulb temperature.
    WetBulb,
}

impl Unknown {
    /// Short symbol of the unknown.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Globe => "Tg",
            Self::WetBulb => "Tnw",
        }
    }

    fn bracket(self, hyper: &Hyperparameters) -> [f64; 2] {
        match self {
            Self::Globe => Hyperparameters::bracket_kelvin(hyper.tg_bracket),
            Self::WetBulb => Hyperparameters::bracket_kelvin(hyper.tnw_bracket),
        }
    }

    fn residual(self, balance: &HeatBalance<'_>, temperature: f64) -> f64 {
        match self {
            Self::Globe => balance.globe_residual(temperature),
            Self::WetBulb => balance.wet_bulb_residual(temperature),
        }
    }
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Globe => write!(f, "globe temperature (Tg)"),
            Self::WetBulb => write!(f, "natural wet-bulb temperature (Tnw)"),
        }
    }
}

/// Raw solver output for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTemperatures {
    pub globe: ThermodynamicTemperature,
    pub wet_bulb: ThermodynamicTemperature,
}

impl CellTemperatures {
    fn from_kelvin(tg: f64, tnw: f64) -> Self {
        Self {
            globe: ThermodynamicTemperature::new::<kelvin>(tg),
            wet_bulb: ThermodynamicTemperature::new::<kelvin>(tnw),
        }
    }
}

/// Solves both unknowns of a cell.
///
/// # Errors
///
/// See [`solve_unknown`].
pub(crate) fn solve_cell(
    params: &CellParams,
    constants: &Constants,
    hyper: &Hyperparameters,
) -> Result<CellTemperatures, SolveError> {
    let tg = solve_unknown(Unknown::Globe, params, constants, hyper)?;
    let tnw = solve_unknown(Unknown::WetBulb, params, constants, hyper)?;
    Ok(CellTemperatures::from_kelvin(tg, tnw))
}

/// Solves one unknown of a cell, returning the temperature in K.
///
/// Returns `NaN` when any parameter is not finite, when `daytime_only` is set
/// and the cell is night, and, with `reject_out_of_bracket`, when the residual
/// does not change sign over the bracket.
///
/// # Errors
///
/// Without `reject_out_of_bracket`, a bracket without a sign change is a
/// [`SolveError::NoRoot`] and a non-finite end residual a
/// [`SolveError::Residual`]. Non-finite residuals inside the bracket,
/// non-convergence and an unusable bracket are errors in both modes.
pub(crate) fn solve_unknown(
    unknown: Unknown,
    params: &CellParams,
    constants: &Constants,
    hyper: &Hyperparameters,
) -> Result<f64, SolveError> {
    if !params.is_finite() {
        return Ok(f64::NAN);
    }
    if hyper.daytime_only && params.is_night(hyper.night_cza.into_inner()) {
        return Ok(f64::NAN);
    }

    let [lo, hi] = unknown.bracket(hyper);
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(SolveError::InvalidBracket { unknown, lo, hi });
    }

    let balance = HeatBalance::new(params, constants);
    let residual = |t: f64| unknown.residual(&balance, t);

    let f_lo = residual(lo);
    let f_hi = residual(hi);
    if !straddles(f_lo, f_hi) {
        if hyper.reject_out_of_bracket {
            return Ok(f64::NAN);
        }
        if let Some((temperature, value)) = [(lo, f_lo), (hi, f_hi)]
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(SolveError::Residual {
                unknown,
                temperature,
                value,
            });
        }
        return Err(no_root(unknown, params, hyper, residual));
    }

    match hyper.method {
        RootMethod::Brent => solve_brent(unknown, params, hyper, residual),
        RootMethod::Bisection => solve_bisection(unknown, hyper, residual),
    }
}

fn solve_brent(
    unknown: Unknown,
    params: &CellParams,
    hyper: &Hyperparameters,
    residual: impl Fn(f64) -> f64,
) -> Result<f64, SolveError> {
    let finite = |temperature: f64| {
        let value = residual(temperature);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NonFiniteResidual { temperature, value })
        }
    };

    match brent::solve(finite, unknown.bracket(hyper), &hyper.brent()) {
        Ok(solution) if solution.status == brent::Status::Converged => Ok(solution.x),
        Ok(solution) => Err(SolveError::MaxIters {
            unknown,
            residual: solution.residual,
            iters: solution.iters,
        }),
        Err(brent::Error::Eval { source, .. }) => Err(SolveError::Residual {
            unknown,
            temperature: source.temperature,
            value: source.value,
        }),
        Err(brent::Error::SameSign { .. }) => Err(no_root(unknown, params, hyper, residual)),
        Err(brent::Error::InvalidBracket) => {
            let [lo, hi] = unknown.bracket(hyper);
            Err(SolveError::InvalidBracket { unknown, lo, hi })
        }
    }
}

fn solve_bisection(
    unknown: Unknown,
    hyper: &Hyperparameters,
    residual: impl Fn(f64) -> f64,
) -> Result<f64, SolveError> {
    let model = ResidualModel::new(residual);

    let solution = bisection::solve(
        &model,
        &ZeroResidual,
        unknown.bracket(hyper),
        &hyper.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // Steer away from a failed evaluation; the failure is reported below.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if let Some(failure) = model.failure() {
        return Err(SolveError::Residual {
            unknown,
            temperature: failure.temperature,
            value: failure.value,
        });
    }

    if solution.status != bisection::Status::Converged {
        return Err(SolveError::MaxIters {
            unknown,
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    Ok(solution.snapshot.output.temperature)
}

fn no_root(
    unknown: Unknown,
    params: &CellParams,
    hyper: &Hyperparameters,
    residual: impl Fn(f64) -> f64,
) -> SolveError {
    let bracket = unknown.bracket(hyper);
    SolveError::NoRoot(Box::new(NoRootDiagnostic {
        unknown,
        bracket,
        xtol: hyper.xtol_kelvin(),
        params: *params,
        scan: scan(residual, bracket[0], bracket[1], SCAN_STEP),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::thermodynamic_temperature::degree_celsius;

    use crate::models::heat_stress::argonne::core::params::tests::example;

    fn solve(unknown: Unknown, params: &CellParams, hyper: &Hyperparameters) -> Result<f64, SolveError> {
        solve_unknown(unknown, params, &Constants::default(), hyper)
    }

    fn cold_brackets(reject: bool) -> Hyperparameters {
        let bracket = [
            ThermodynamicTemperature::new::<degree_celsius>(0.0),
            ThermodynamicTemperature::new::<degree_celsius>(10.0),
        ];
        Hyperparameters {
            tg_bracket: bracket,
            tnw_bracket: bracket,
            reject_out_of_bracket: reject,
            ..Hyperparameters::default()
        }
    }

    #[test]
    fn example_cell_solves_with_brent() {
        let cell = example();
        let hyper = Hyperparameters::default();
        let constants = Constants::default();
        let balance = HeatBalance::new(&cell, &constants);

        let tg = solve(Unknown::Globe, &cell, &hyper).unwrap();
        let tnw = solve(Unknown::WetBulb, &cell, &hyper).unwrap();
        assert_relative_eq!(tg, 343.213, epsilon = 0.02);
        assert_relative_eq!(tnw, 294.192, epsilon = 0.02);

        // The residual changes sign within the tolerance around each root.
        let xtol = hyper.xtol_kelvin();
        assert!(straddles(
            balance.globe_residual(tg - xtol),
            balance.globe_residual(tg + xtol)
        ));
        assert!(straddles(
            balance.wet_bulb_residual(tnw - xtol),
            balance.wet_bulb_residual(tnw + xtol)
        ));
    }

    #[test]
    fn bisection_agrees_with_brent() {
        let cell = example();
        let with_brent = Hyperparameters::default();
        let with_bisection = Hyperparameters {
            method: RootMethod::Bisection,
            ..with_brent
        };

        for unknown in [Unknown::Globe, Unknown::WetBulb] {
            let a = solve(unknown, &cell, &with_brent).unwrap();
            let b = solve(unknown, &cell, &with_bisection).unwrap();
            assert_relative_eq!(a, b, epsilon = 0.02);
        }
    }

    #[test]
    fn example_wbgt_is_within_sanity_band() {
        let temps = solve_cell(&example(), &Constants::default(), &Hyperparameters::default())
            .unwrap();
        let wbgt = 0.1 * 300.0
            + 0.2 * temps.globe.get::<kelvin>()
            + 0.7 * temps.wet_bulb.get::<kelvin>();
        assert!(wbgt > 300.0 && wbgt < 315.0, "{wbgt}");
    }

    #[test]
    fn wet_bulb_rises_with_humidity() {
        let hyper = Hyperparameters::default();
        let esat = crate::support::air::saturated_vapor_pressure(
            ThermodynamicTemperature::new::<kelvin>(300.0),
        )
        .get::<uom::si::pressure::kilopascal>();

        let mut previous = f64::NEG_INFINITY;
        for rh in [0.2, 0.4, 0.6, 0.8] {
            let mut row = example().to_row();
            row[2] = rh;
            row[3] = rh * esat;
            let tnw = solve(Unknown::WetBulb, &CellParams::from_row(row), &hyper).unwrap();
            assert!(tnw > previous, "rh={rh}: {tnw} <= {previous}");
            previous = tnw;
        }
    }

    #[test]
    fn night_is_nan_only_in_daytime_mode() {
        let mut row = example().to_row();
        row[6] = 0.0;
        row[8] = 0.01;
        let night = CellParams::from_row(row);

        let daytime = Hyperparameters {
            daytime_only: true,
            ..Hyperparameters::default()
        };
        assert!(solve(Unknown::Globe, &night, &daytime).unwrap().is_nan());
        assert!(solve(Unknown::WetBulb, &night, &daytime).unwrap().is_nan());

        let always = Hyperparameters::default();
        assert_relative_eq!(solve(Unknown::Globe, &night, &always).unwrap(), 286.30, epsilon = 0.05);
        assert_relative_eq!(solve(Unknown::WetBulb, &night, &always).unwrap(), 292.17, epsilon = 0.05);
    }

    #[test]
    fn non_finite_input_is_nan() {
        let mut row = example().to_row();
        row[5] = f64::NAN;
        let cell = CellParams::from_row(row);
        let hyper = Hyperparameters {
            reject_out_of_bracket: false,
            ..Hyperparameters::default()
        };
        assert!(solve(Unknown::Globe, &cell, &hyper).unwrap().is_nan());
    }

    #[test]
    fn precheck_rejects_bracket_without_sign_change() {
        let hyper = cold_brackets(true);
        assert!(solve(Unknown::Globe, &example(), &hyper).unwrap().is_nan());
        assert!(solve(Unknown::WetBulb, &example(), &hyper).unwrap().is_nan());
    }

    #[test]
    fn wet_bulb_diagnostic_reports_its_own_bracket() {
        let hyper = Hyperparameters {
            tnw_bracket: [
                ThermodynamicTemperature::new::<degree_celsius>(0.0),
                ThermodynamicTemperature::new::<degree_celsius>(10.0),
            ],
            reject_out_of_bracket: false,
            ..Hyperparameters::default()
        };

        // The globe bracket is untouched and still solves.
        assert!(solve(Unknown::Globe, &example(), &hyper).is_ok());

        let Err(SolveError::NoRoot(diagnostic)) = solve(Unknown::WetBulb, &example(), &hyper)
        else {
            panic!("expected a no-root diagnostic");
        };
        assert_eq!(diagnostic.unknown, Unknown::WetBulb);
        assert_relative_eq!(diagnostic.bracket[0], 273.15, epsilon = 1e-9);
        assert_relative_eq!(diagnostic.bracket[1], 283.15, epsilon = 1e-9);
        assert_eq!(diagnostic.scan.len(), 2);
        assert!(diagnostic.scan.iter().all(|(_, r)| *r < 0.0));

        let text = diagnostic.to_string();
        assert!(text.contains("Tnw"));
        assert!(text.contains("[0.00, 10.00] °C"));
        assert!(text.contains("rh=0.5"));
    }

    #[test]
    fn globe_diagnostic_scans_every_ten_degrees() {
        let hyper = Hyperparameters {
            tg_bracket: [
                ThermodynamicTemperature::new::<degree_celsius>(-60.0),
                ThermodynamicTemperature::new::<degree_celsius>(60.0),
            ],
            reject_out_of_bracket: false,
            ..Hyperparameters::default()
        };

        let Err(SolveError::NoRoot(diagnostic)) = solve(Unknown::Globe, &example(), &hyper) else {
            panic!("expected a no-root diagnostic");
        };
        assert_eq!(diagnostic.scan.len(), 13);
        assert_relative_eq!(diagnostic.scan[12].0, 333.15, epsilon = 1e-9);
    }

    #[test]
    fn inverted_bracket_is_an_error() {
        let hyper = Hyperparameters {
            tg_bracket: [
                ThermodynamicTemperature::new::<degree_celsius>(50.0),
                ThermodynamicTemperature::new::<degree_celsius>(0.0),
            ],
            ..Hyperparameters::default()
        };
        assert!(matches!(
            solve(Unknown::Globe, &example(), &hyper),
            Err(SolveError::InvalidBracket {
                unknown: Unknown::Globe,
                ..
            })
        ));
    }

    #[test]
    fn iteration_limit_is_reported() {
        let hyper = Hyperparameters {
            max_iters: 1,
            ..Hyperparameters::default()
        };
        assert!(matches!(
            solve(Unknown::Globe, &example(), &hyper),
            Err(SolveError::MaxIters { iters: 1, .. })
        ));
    }
}
