//! Gridded meteorological datasets.
//!
//! A [`Grid`] is the `(time, latitude, longitude)` coordinate space shared by
//! every field of a [`Dataset`]. All field arrays have the grid's shape and
//! that dimension order, which is checked whenever a field enters a dataset.

mod dataset;
mod error;
mod field;

#[cfg(test)]
pub(crate) mod test_support;

pub use dataset::Dataset;
pub use error::GridError;
pub use field::{Field, FieldMeta};

use jiff::Timestamp;
use ndarray::{Array3, Axis as NdAxis};

/// Shape of a grid: `(time, latitude, longitude)`.
pub type Shape = (usize, usize, usize);

/// Dimensions of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Time,
    Latitude,
    Longitude,
}

impl Axis {
    /// Coordinate name of this axis.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Time => 0,
            Self::Latitude => 1,
            Self::Longitude => 2,
        }
    }
}

/// Coordinates of a gridded dataset.
///
/// Latitudes and longitudes are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    time: Vec<Timestamp>,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
}

impl Grid {
    /// Creates a grid from its coordinate vectors.
    #[must_use]
    pub fn new(time: Vec<Timestamp>, latitude: Vec<f64>, longitude: Vec<f64>) -> Self {
        Self {
            time,
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn time(&self) -> &[Timestamp] {
        &self.time
    }

    #[must_use]
    pub fn latitude(&self) -> &[f64] {
        &self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> &[f64] {
        &self.longitude
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        (self.time.len(), self.latitude.len(), self.longitude.len())
    }

    /// Number of grid cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len() * self.latitude.len() * self.longitude.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of one axis.
    #[must_use]
    pub fn axis_len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Time => self.time.len(),
            Axis::Latitude => self.latitude.len(),
            Axis::Longitude => self.longitude.len(),
        }
    }

    /// Time coordinate as seconds since the Unix epoch.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unix_seconds(&self) -> Vec<f64> {
        self.time
            .iter()
            .map(|t| t.as_millisecond() as f64 / 1000.0)
            .collect()
    }

    /// Repeats per-axis values across the whole grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateLength`] if `values` does not have the
    /// length of `axis`.
    pub fn broadcast(&self, axis: Axis, values: &[f64]) -> Result<Array3<f64>, GridError> {
        let expected = self.axis_len(axis);
        if values.len() != expected {
            return Err(GridError::CoordinateLength {
                coordinate: axis.name(),
                expected,
                found: values.len(),
            });
        }

        let mut out = Array3::zeros(self.shape());
        for (lane_index, mut lane) in out.axis_iter_mut(NdAxis(axis.index())).enumerate() {
            lane.fill(values[lane_index]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_support::small_grid;

    #[test]
    fn shape_follows_coordinates() {
        let grid = small_grid();
        assert_eq!(grid.shape(), (2, 3, 2));
        assert_eq!(grid.len(), 12);
        assert!(!grid.is_empty());
    }

    #[test]
    fn broadcast_along_each_axis() {
        let grid = small_grid();

        let lat = grid.broadcast(Axis::Latitude, grid.latitude()).unwrap();
        assert_eq!(lat[[1, 2, 0]], 53.0);
        assert_eq!(lat[[0, 0, 1]], 51.0);

        let lon = grid.broadcast(Axis::Longitude, grid.longitude()).unwrap();
        assert_eq!(lon[[1, 2, 1]], 5.0);

        let ts = grid.broadcast(Axis::Time, &grid.unix_seconds()).unwrap();
        assert_eq!(ts[[1, 0, 0]] - ts[[0, 2, 1]], 3600.0);
    }

    #[test]
    fn broadcast_checks_length() {
        let grid = small_grid();
        let err = grid.broadcast(Axis::Time, &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            GridError::CoordinateLength {
                coordinate: "time",
                expected: 2,
                found: 1
            }
        ));
    }
}
