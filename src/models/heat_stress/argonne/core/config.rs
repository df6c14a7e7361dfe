use uom::si::{
    f64::{Length, TemperatureInterval, ThermodynamicTemperature, Velocity},
    length::meter,
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::{degree_celsius, kelvin},
    velocity::meter_per_second,
};

use crate::support::{
    constraint::{Constrained, NonNegative, StrictlyPositive, UnitInterval},
    root::brent,
};

/// Root-finding algorithm used per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RootMethod {
    /// Brent's method.
    #[default]
    Brent,

    /// Plain bisection through `twine_solvers`.
    Bisection,
}

/// Run-time settings of the Argonne solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    /// Search bracket for the globe temperature.
    pub tg_bracket: [ThermodynamicTemperature; 2],

    /// Search bracket for the natural wet-bulb temperature.
    pub tnw_bracket: [ThermodynamicTemperature; 2],

    /// Absolute tolerance on the solved temperatures.
    pub xtol: Constrained<TemperatureInterval, StrictlyPositive>,

    /// Maximum root-finder iterations per unknown.
    pub max_iters: usize,

    pub method: RootMethod,

    /// Return `NaN` for cells without usable direct sunlight.
    pub daytime_only: bool,

    /// Return `NaN` instead of an error when the residual does not change
    /// sign over the bracket.
    pub reject_out_of_bracket: bool,

    /// Cosine of the solar zenith angle at or below which a cell is night.
    pub night_cza: Constrained<f64, UnitInterval>,

    /// Lower limit of the wind speed at sensor height.
    pub min_wind_speed: Constrained<Velocity, NonNegative>,

    /// Sensor height the 10 m wind is scaled to.
    pub wind_height: Constrained<Length, StrictlyPositive>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            tg_bracket: [
                ThermodynamicTemperature::new::<degree_celsius>(-60.0),
                ThermodynamicTemperature::new::<degree_celsius>(120.0),
            ],
            tnw_bracket: [
                ThermodynamicTemperature::new::<degree_celsius>(-60.0),
                ThermodynamicTemperature::new::<degree_celsius>(90.0),
            ],
            xtol: Constrained::new_unchecked(TemperatureInterval::new::<delta_kelvin>(0.01)),
            max_iters: 100,
            method: RootMethod::Brent,
            daytime_only: false,
            reject_out_of_bracket: true,
            night_cza: Constrained::new_unchecked(87.5_f64.to_radians().cos()),
            min_wind_speed: Constrained::new_unchecked(Velocity::new::<meter_per_second>(0.1)),
            wind_height: Constrained::new_unchecked(Length::new::<meter>(2.0)),
        }
    }
}

impl Hyperparameters {
    /// Bracket ends in kelvin.
    pub(crate) fn bracket_kelvin(bracket: [ThermodynamicTemperature; 2]) -> [f64; 2] {
        [bracket[0].get::<kelvin>(), bracket[1].get::<kelvin>()]
    }

    pub(crate) fn xtol_kelvin(&self) -> f64 {
        self.xtol.as_ref().get::<delta_kelvin>()
    }

    pub(crate) fn brent(&self) -> brent::Config {
        brent::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.xtol_kelvin(),
            ..brent::Config::default()
        }
    }

    pub(crate) fn bisection(&self) -> twine_solvers::equation::bisection::Config {
        twine_solvers::equation::bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.xtol_kelvin(),
            x_rel_tol: 0.0,
            residual_tol: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_brackets_in_kelvin() {
        let hyper = Hyperparameters::default();
        let [lo, hi] = Hyperparameters::bracket_kelvin(hyper.tg_bracket);
        assert_relative_eq!(lo, 213.15, epsilon = 1e-9);
        assert_relative_eq!(hi, 393.15, epsilon = 1e-9);

        let [_, hi] = Hyperparameters::bracket_kelvin(hyper.tnw_bracket);
        assert_relative_eq!(hi, 363.15, epsilon = 1e-9);
    }

    #[test]
    fn solver_configs_follow_tolerance() {
        let hyper = Hyperparameters {
            xtol: StrictlyPositive::new(TemperatureInterval::new::<delta_kelvin>(0.1)).unwrap(),
            max_iters: 40,
            ..Hyperparameters::default()
        };

        assert_relative_eq!(hyper.brent().x_abs_tol, 0.1);
        assert_eq!(hyper.brent().max_iters, 40);
        assert_relative_eq!(hyper.bisection().x_abs_tol, 0.1);
        assert_relative_eq!(hyper.night_cza.into_inner(), 0.043_619_4, epsilon = 1e-6);
    }
}
