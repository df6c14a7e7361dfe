use thiserror::Error;

use crate::{
    models::heat_stress::argonne::CellError,
    support::{
        generators::{GeneratorError, Options, ResolveError},
        grid::{Dataset, GridError},
    },
};

/// A named computation over a gridded dataset.
///
/// The [`Tool`](crate::Tool) makes sure every field in
/// [`required_fields`](Calculator::required_fields) is present, hands
/// [`execute`](Calculator::execute) a private copy holding only those fields,
/// and merges the [`exports`](Calculator::exports) of the returned dataset
/// back under their new names.
pub trait Calculator: Send + Sync {
    /// Name the calculator is requested by.
    fn name(&self) -> &str;

    /// Fields that must be present before [`Calculator::execute`] runs.
    ///
    /// Fields are resolved in this order, so a field derivable from an
    /// earlier one should come after it.
    fn required_fields(&self) -> &[&'static str];

    /// Runs the calculation on a working copy of the data.
    ///
    /// # Errors
    ///
    /// Returns a [`CalculatorError`] if the calculation fails.
    fn execute(&self, data: &Dataset, options: &Options) -> Result<Dataset, CalculatorError>;

    /// `(field, exported name)` pairs merged into the shared dataset.
    fn exports(&self) -> &[(&'static str, &'static str)];
}

/// Errors from running a [`Calculator`].
#[derive(Debug, Error)]
pub enum CalculatorError {
    /// A required field is absent and no generator could supply it.
    #[error("calculator `{calculator}` is missing field `{field}`")]
    MissingData {
        calculator: String,
        field: String,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    /// A grid cell could not be solved.
    #[error("cell solve failed")]
    Solve(#[from] CellError),

    /// A tool option has the wrong type or value.
    #[error("invalid option")]
    Option(#[from] GeneratorError),
}
