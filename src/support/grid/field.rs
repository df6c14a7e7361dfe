use std::collections::BTreeMap;

use ndarray::Array3;

/// Descriptive metadata attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    /// Unit string, for example `"K"` or `"W m**-2"`.
    pub units: String,

    /// Human-readable name.
    pub long_name: String,

    /// Free-form attributes such as provenance or literature references.
    pub attrs: BTreeMap<String, String>,
}

impl FieldMeta {
    #[must_use]
    pub fn new(units: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            long_name: long_name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// A named physical field: grid-shaped values plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub values: Array3<f64>,
    pub meta: FieldMeta,
}

impl Field {
    #[must_use]
    pub fn new(values: Array3<f64>, meta: FieldMeta) -> Self {
        Self { values, meta }
    }
}
