use std::{collections::BTreeMap, sync::Arc};

use ndarray::Array3;

use super::{Axis, Field, FieldMeta, Grid, GridError, Shape};

/// A set of named fields on a shared [`Grid`].
///
/// Every field has the grid's shape. Inserting under an existing name
/// replaces the previous field.
#[derive(Debug, Clone)]
pub struct Dataset {
    grid: Arc<Grid>,
    fields: BTreeMap<String, Field>,
}

impl Dataset {
    /// Creates an empty dataset on `grid`.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid: Arc::new(grid),
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.grid.shape()
    }

    /// Returns `true` if `name` is a field or a coordinate of this dataset.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
            || [Axis::Time, Axis::Latitude, Axis::Longitude]
                .iter()
                .any(|axis| axis.name() == name)
    }

    /// Returns `true` if every name is a field or coordinate.
    #[must_use]
    pub fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.contains(name))
    }

    /// Returns the names that are neither fields nor coordinates.
    #[must_use]
    pub fn missing<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Returns a field.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingField`] if there is no field named `name`.
    pub fn get(&self, name: &str) -> Result<&Field, GridError> {
        self.fields.get(name).ok_or_else(|| GridError::missing(name))
    }

    /// Returns the values of a field.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingField`] if there is no field named `name`.
    pub fn values(&self, name: &str) -> Result<&Array3<f64>, GridError> {
        self.get(name).map(|field| &field.values)
    }

    /// Inserts or replaces a field.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if `values` does not have the grid's shape.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Array3<f64>,
        meta: FieldMeta,
    ) -> Result<(), GridError> {
        self.insert_field(name, Field::new(values, meta))
    }

    /// Inserts or replaces a field from values in `(time, latitude, longitude)`
    /// row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Length`] if there is not exactly one value per cell.
    pub fn insert_flat(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
        meta: FieldMeta,
    ) -> Result<(), GridError> {
        let name = name.into();
        let found = values.len();
        let values = Array3::from_shape_vec(self.shape(), values).map_err(|_| {
            GridError::Length {
                field: name.clone(),
                expected: self.grid.len(),
                found,
            }
        })?;
        self.insert_field(name, Field::new(values, meta))
    }

    /// Inserts or replaces a field.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the field does not have the grid's shape.
    pub fn insert_field(&mut self, name: impl Into<String>, field: Field) -> Result<(), GridError> {
        let name = name.into();
        let expected = self.shape();
        let found = field.values.dim();
        if found != expected {
            return Err(GridError::ShapeMismatch {
                field: name,
                expected,
                found,
            });
        }
        self.fields.insert(name, field);
        Ok(())
    }

    /// Removes and returns a field.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.remove(name)
    }

    /// Moves a field to a new name, replacing any field already there.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingField`] if there is no field named `from`.
    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<(), GridError> {
        let field = self.remove(from).ok_or_else(|| GridError::missing(from))?;
        self.fields.insert(to.into(), field);
        Ok(())
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns a dataset with the same grid and only the named fields.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingField`] for the first name that is not a field.
    pub fn select(&self, names: &[&str]) -> Result<Self, GridError> {
        let mut out = self.copy_empty();
        for &name in names {
            out.fields.insert(name.to_owned(), self.get(name)?.clone());
        }
        Ok(out)
    }

    /// Returns a dataset with the same grid and no fields.
    #[must_use]
    pub fn copy_empty(&self) -> Self {
        Self {
            grid: Arc::clone(&self.grid),
            fields: BTreeMap::new(),
        }
    }

    /// Copies fields from `other` into this dataset under new names.
    ///
    /// Each pair is `(name in other, name here)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the grids differ in shape and
    /// [`GridError::MissingField`] if `other` lacks a named field. Nothing is
    /// merged when an error is returned.
    pub fn merge_renamed(&mut self, other: &Self, renames: &[(&str, &str)]) -> Result<(), GridError> {
        if other.shape() != self.shape() {
            let field = renames.first().map_or_else(String::new, |(from, _)| (*from).to_owned());
            return Err(GridError::ShapeMismatch {
                field,
                expected: self.shape(),
                found: other.shape(),
            });
        }

        let exported = renames
            .iter()
            .map(|&(from, to)| -> Result<_, GridError> {
                Ok((to.to_owned(), other.get(from)?.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.fields.extend(exported);
        Ok(())
    }

    /// Copies every field of `other` into this dataset.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the grids differ in shape.
    pub fn merge(&mut self, other: &Self) -> Result<(), GridError> {
        let names: Vec<&str> = other.field_names().collect();
        let renames: Vec<(&str, &str)> = names.iter().map(|&name| (name, name)).collect();
        self.merge_renamed(other, &renames)
    }
}
