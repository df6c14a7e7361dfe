use std::fmt;

use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::{
    models::heat_stress::argonne::core::{params::CellParams, solve::Unknown},
    support::units::kelvin_to_celsius,
};

/// Errors from solving one grid cell.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The residual does not change sign over the bracket.
    #[error("{0}")]
    NoRoot(Box<NoRootDiagnostic>),

    /// The residual evaluated to a non-finite value.
    #[error("{unknown} residual is {value} at {temperature} K")]
    Residual {
        unknown: Unknown,
        temperature: f64,
        value: f64,
    },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("{unknown} solver hit iteration limit: residual={residual}")]
    MaxIters {
        unknown: Unknown,

        /// Residual at the last estimate.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// The configured bracket is not a finite, increasing interval.
    #[error("invalid {unknown} bracket [{lo}, {hi}] K")]
    InvalidBracket { unknown: Unknown, lo: f64, hi: f64 },
}

/// Everything an analyst needs to see why a cell has no root.
#[derive(Debug, Clone, PartialEq)]
pub struct NoRootDiagnostic {
    pub unknown: Unknown,

    /// Searched bracket in K.
    pub bracket: [f64; 2],

    /// Solver tolerance in K.
    pub xtol: f64,

    pub params: CellParams,

    /// Residual at every 10 °C from the bracket low end to its high end.
    pub scan: Vec<(f64, f64)>,
}

impl fmt::Display for NoRootDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [lo, hi] = self.bracket;
        writeln!(
            f,
            "no root for {} in [{:.2}, {:.2}] °C (xtol {} K)",
            self.unknown,
            kelvin_to_celsius(lo),
            kelvin_to_celsius(hi),
            self.xtol,
        )?;
        writeln!(f, "  inputs: {}", self.params)?;
        write!(f, "  residual scan:")?;
        for (t, r) in &self.scan {
            write!(f, "\n    {:>7.2} °C: {r:.6e}", kelvin_to_celsius(*t))?;
        }
        Ok(())
    }
}
