use thiserror::Error;

use crate::support::grid::GridError;

/// Errors raised by a generator while it runs.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A dataset operation failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// A required option is not set.
    #[error("option `{option}` is not set")]
    MissingOption { option: String },

    /// An option has the wrong type or value.
    #[error("option `{option}` must be {expected}")]
    InvalidOption {
        option: String,
        expected: &'static str,
    },

    /// A chained input could not be resolved.
    #[error("could not derive an input field")]
    Input(#[source] Box<ResolveError>),
}

impl From<ResolveError> for GeneratorError {
    fn from(err: ResolveError) -> Self {
        Self::Input(Box::new(err))
    }
}

/// Errors from resolving a missing field.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No generator produces this field.
    #[error("no known generator for `{field}`")]
    NoGenerator { field: String },

    /// Generators exist but none has its required fields and options available.
    #[error("no generator for `{field}` has its requirements satisfied")]
    Unsatisfiable { field: String },

    /// A chained request asked for a field that is already being generated.
    #[error("generator cycle: {}", .chain.join(" -> "))]
    Cycle { chain: Vec<String> },

    /// A chained request went deeper than the allowed number of hops.
    #[error("`{field}` would need {depth} chained generator hops")]
    DepthExceeded { field: String, depth: usize },

    /// The selected generator failed.
    #[error("generator `{generator}` failed to produce `{field}`")]
    Generator {
        field: String,
        generator: String,
        #[source]
        source: Box<GeneratorError>,
    },

    /// The selected generator returned without producing the field.
    #[error("generator `{generator}` did not produce `{field}`")]
    NotProduced { field: String, generator: String },
}

impl ResolveError {
    /// The field whose resolution failed.
    ///
    /// For cycles this is the repeated field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::NoGenerator { field }
            | Self::Unsatisfiable { field }
            | Self::DepthExceeded { field, .. }
            | Self::Generator { field, .. }
            | Self::NotProduced { field, .. } => field,
            Self::Cycle { chain } => chain.last().map_or("", String::as_str),
        }
    }
}
