//! Liljegren globe and natural wet-bulb temperature solver.
//!
//! The solver works cell by cell: [`params::CellParams`] holds the ten
//! meteorological inputs of one cell, [`balance`] turns them into the globe
//! and wick energy-balance residuals, and [`solve`] finds the root of each
//! inside a configured bracket. [`dispatch`] maps that over a whole grid and
//! [`closing`] applies the standard-globe correction and the WBGT weighting.

mod balance;
mod closing;
mod config;
mod constants;
mod dispatch;
mod params;
mod residual;
mod solve;

pub use config::{Hyperparameters, RootMethod};
pub use constants::{Constants, Globe, STEFAN_BOLTZMANN, Wick};
pub use dispatch::{CellError, ChunkProgress, Execution};
pub use params::{CellParams, FIELDS};
pub use solve::{CellTemperatures, NoRootDiagnostic, SolveError, Unknown};

pub(crate) use closing::{standard_globe, wbgt};
pub(crate) use dispatch::{ParamFields, SolvedGrid, solve_grid};
pub(crate) use solve::{solve_cell, solve_unknown};
