use thiserror::Error;

use super::Shape;

/// Errors from gridded dataset operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    /// A field does not have the grid's shape.
    #[error("field `{field}` has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        field: String,
        expected: Shape,
        found: Shape,
    },

    /// A flat buffer does not hold one value per grid cell.
    #[error("field `{field}` has {found} values, expected {expected}")]
    Length {
        field: String,
        expected: usize,
        found: usize,
    },

    /// A field is not in the dataset.
    #[error("field `{field}` is not in the dataset")]
    MissingField { field: String },

    /// Per-axis values do not match a coordinate's length.
    #[error("coordinate `{coordinate}` has length {expected}, got {found} values")]
    CoordinateLength {
        coordinate: &'static str,
        expected: usize,
        found: usize,
    },
}

impl GridError {
    pub(super) fn missing(field: &str) -> Self {
        Self::MissingField {
            field: field.to_owned(),
        }
    }
}
