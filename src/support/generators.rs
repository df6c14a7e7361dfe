//! Dependency-resolving field generators.
//!
//! A [`Generator`] derives one or more dataset fields from other fields and
//! tool [`Options`]. The [`GeneratorRegistry`] keeps generators in
//! registration order, and [`GeneratorRegistry::resolve`] picks the first
//! candidate for a missing field whose required fields and options are all
//! present, then runs it.
//!
//! Generators may ask for further fields while running (see
//! [`Context::ensure`]). Those nested requests go through the same registry,
//! but at most [`MAX_CHAIN_DEPTH`] hops deep and never back into a field that
//! is already being generated. This is a bounded convenience, not a general
//! dependency solver.

mod common;
mod context;
mod error;
mod options;
mod radiation;
mod registry;
mod solar;

pub use context::Context;
pub use error::{GeneratorError, ResolveError};
pub use options::{OptionValue, Options};
pub use radiation::deaccumulate;
pub use registry::{Generator, GeneratorFn, GeneratorRegistry, MAX_CHAIN_DEPTH, Resolution};

/// Names of the tool options consulted by built-in generators and models.
pub mod option {
    /// Length of the radiation accumulation period in seconds.
    pub const RADIATION_INTEGRATION_TIME: &str = "radiation_integration_time";

    /// Radiation fields accumulate since the start of the series.
    pub const RADIATION_CUMULATIVE: &str = "radiation_cumulative";

    /// Lower limit for estimated near-surface wind speeds, in m/s.
    pub const WINDSPEED_LOWLIMIT: &str = "windspeed_lowlimit";
}
