use ndarray::Array3;

use crate::support::grid::{Dataset, FieldMeta, Grid};

use super::{GeneratorError, GeneratorRegistry, Options, Resolution};

/// What a running generator sees: the dataset it writes into, the tool
/// options, and a handle for requesting further fields.
pub struct Context<'a> {
    pub(super) data: &'a mut Dataset,
    pub(super) options: &'a Options,
    pub(super) registry: &'a GeneratorRegistry,
    pub(super) chain: &'a mut Vec<String>,
}

impl Context<'_> {
    #[must_use]
    pub fn data(&self) -> &Dataset {
        &*self.data
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.data.grid()
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        self.options
    }

    /// Values of a field that must already be present.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Grid`] if the field is missing.
    pub fn values(&self, name: &str) -> Result<&Array3<f64>, GeneratorError> {
        Ok(self.data.values(name)?)
    }

    /// Writes a generated field.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Grid`] on a shape mismatch.
    pub fn insert(
        &mut self,
        name: &str,
        values: Array3<f64>,
        meta: FieldMeta,
    ) -> Result<(), GeneratorError> {
        Ok(self.data.insert(name, values, meta)?)
    }

    /// Makes sure `field` is present, generating it through the registry if needed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Input`] if the field cannot be resolved,
    /// including when the request would form a cycle or exceed
    /// [`super::MAX_CHAIN_DEPTH`] hops.
    pub fn ensure(&mut self, field: &str) -> Result<Resolution, GeneratorError> {
        self.registry
            .resolve_chained(self.data, self.options, field, self.chain)
            .map_err(GeneratorError::from)
    }

    /// [`Context::ensure`] for several fields, in order.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure.
    pub fn ensure_all(&mut self, fields: &[&str]) -> Result<(), GeneratorError> {
        for field in fields {
            self.ensure(field)?;
        }
        Ok(())
    }

    /// Fields currently being generated, outermost first.
    #[must_use]
    pub fn chain(&self) -> &[String] {
        self.chain.as_slice()
    }
}
