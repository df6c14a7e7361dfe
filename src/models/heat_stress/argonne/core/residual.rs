//! Residual formulation for the `twine_solvers` bisection path.

use std::{cell::Cell, convert::Infallible};

use thiserror::Error;
use twine_core::{EquationProblem, Model};
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

/// A residual that evaluated to `NaN` or an infinity.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("non-finite residual {value} at {temperature} K")]
pub(crate) struct NonFiniteResidual {
    pub(crate) temperature: f64,
    pub(crate) value: f64,
}

/// Residual at one trial temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Residual {
    pub(crate) temperature: f64,
    pub(crate) value: f64,
}

/// Model adapter exposing a balance residual to the bisection solver.
///
/// Non-finite residuals are returned as errors and the first one is kept,
/// so the caller can report it once the solver returns.
pub(crate) struct ResidualModel<F> {
    residual: F,
    failure: Cell<Option<NonFiniteResidual>>,
}

impl<F: Fn(f64) -> f64> ResidualModel<F> {
    pub(crate) fn new(residual: F) -> Self {
        Self {
            residual,
            failure: Cell::new(None),
        }
    }

    /// First non-finite residual seen, if any.
    pub(crate) fn failure(&self) -> Option<NonFiniteResidual> {
        self.failure.get()
    }
}

impl<F: Fn(f64) -> f64> Model for ResidualModel<F> {
    type Input = ThermodynamicTemperature;
    type Output = Residual;
    type Error = NonFiniteResidual;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let temperature = input.get::<kelvin>();
        let value = (self.residual)(temperature);
        if value.is_finite() {
            return Ok(Residual { temperature, value });
        }

        let failure = NonFiniteResidual { temperature, value };
        if self.failure.get().is_none() {
            self.failure.set(Some(failure));
        }
        Err(failure)
    }
}

/// Drives the residual to zero.
pub(crate) struct ZeroResidual;

impl EquationProblem<1> for ZeroResidual {
    type Input = ThermodynamicTemperature;
    type Output = Residual;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(ThermodynamicTemperature::new::<kelvin>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.value])
    }
}
