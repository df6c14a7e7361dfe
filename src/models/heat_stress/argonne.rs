//! Liljegren (Argonne) Wet Bulb Globe Temperature model.
//!
//! [`ArgonneModel`] solves single cells and implements [`twine_core::Model`];
//! [`ArgonneCalculator`] runs the model over a gridded dataset.

mod calculator;
pub(crate) mod core;

pub use calculator::ArgonneCalculator;
pub use self::core::{
    CellError, CellParams, CellTemperatures, ChunkProgress, Constants, Execution, FIELDS, Globe,
    Hyperparameters, NoRootDiagnostic, RootMethod, STEFAN_BOLTZMANN, SolveError, Unknown, Wick,
};

use twine_core::Model;
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

/// Liljegren WBGT model with fixed constants and solver settings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArgonneModel {
    pub constants: Constants,
    pub hyperparameters: Hyperparameters,
}

impl ArgonneModel {
    #[must_use]
    pub fn new(constants: Constants, hyperparameters: Hyperparameters) -> Self {
        Self {
            constants,
            hyperparameters,
        }
    }

    /// Solves the globe and natural wet-bulb temperatures of one cell.
    ///
    /// Gated cells come back as `NaN`. With `reject_out_of_bracket` disabled,
    /// a cell without a root in the bracket fails with a
    /// [`SolveError::NoRoot`] diagnostic.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if either unknown cannot be solved.
    pub fn solve_cell(&self, params: &CellParams) -> Result<CellTemperatures, SolveError> {
        core::solve_cell(params, &self.constants, &self.hyperparameters)
    }

    /// Solves a single unknown of one cell.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if the unknown cannot be solved.
    pub fn solve(
        &self,
        unknown: Unknown,
        params: &CellParams,
    ) -> Result<ThermodynamicTemperature, SolveError> {
        core::solve_unknown(unknown, params, &self.constants, &self.hyperparameters)
            .map(ThermodynamicTemperature::new::<kelvin>)
    }
}

impl Model for ArgonneModel {
    type Input = CellParams;
    type Output = CellTemperatures;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.solve_cell(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::thermodynamic_temperature::degree_celsius;

    fn example() -> CellParams {
        CellParams::from_row([300.0, 305.0, 0.5, 1.7, 101.3, 2.0, 800.0, 0.7, 0.8, 0.2])
    }

    #[test]
    fn model_call_matches_solve_cell() {
        let model = ArgonneModel::default();
        let called = model.call(&example()).unwrap();
        let direct = model.solve_cell(&example()).unwrap();
        assert_eq!(called, direct);
        assert_relative_eq!(called.globe.get::<kelvin>(), 343.213, epsilon = 0.02);
    }

    #[test]
    fn single_unknown() {
        let model = ArgonneModel::default();
        let tnw = model.solve(Unknown::WetBulb, &example()).unwrap();
        assert_relative_eq!(tnw.get::<kelvin>(), 294.192, epsilon = 0.02);
    }

    #[test]
    fn diagnostic_mode_surfaces_no_root() {
        let model = ArgonneModel::new(
            Constants::default(),
            Hyperparameters {
                tg_bracket: [
                    ThermodynamicTemperature::new::<degree_celsius>(0.0),
                    ThermodynamicTemperature::new::<degree_celsius>(10.0),
                ],
                reject_out_of_bracket: false,
                ..Hyperparameters::default()
            },
        );

        let err = model.call(&example()).unwrap_err();
        let SolveError::NoRoot(diagnostic) = err else {
            panic!("expected a no-root diagnostic");
        };
        assert_eq!(diagnostic.unknown, Unknown::Globe);
        assert!(diagnostic.to_string().contains("Tg"));
    }

    #[test]
    fn night_cell_is_nan_in_daytime_mode() {
        let model = ArgonneModel::new(
            Constants::default(),
            Hyperparameters {
                daytime_only: true,
                ..Hyperparameters::default()
            },
        );
        let mut row = example().to_row();
        row[6] = 0.0;
        let temps = model.solve_cell(&CellParams::from_row(row)).unwrap();
        assert!(temps.globe.get::<kelvin>().is_nan());
        assert!(temps.wet_bulb.get::<kelvin>().is_nan());
    }
}
