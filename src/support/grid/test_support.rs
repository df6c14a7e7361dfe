//! Shared fixtures for dataset tests.

use ndarray::Array3;

use super::{Dataset, FieldMeta, Grid};

/// A 2 × 3 × 2 grid over the Netherlands around midsummer noon.
pub(crate) fn small_grid() -> Grid {
    Grid::new(
        vec![
            "2024-06-21T11:00:00Z".parse().unwrap(),
            "2024-06-21T12:00:00Z".parse().unwrap(),
        ],
        vec![51.0, 52.0, 53.0],
        vec![4.0, 5.0],
    )
}

/// A dataset on [`small_grid`] with each named field set to a constant.
pub(crate) fn constant_dataset(fields: &[(&str, f64)]) -> Dataset {
    let grid = small_grid();
    let shape = grid.shape();
    let mut ds = Dataset::new(grid);
    for &(name, value) in fields {
        ds.insert(name, Array3::from_elem(shape, value), FieldMeta::default())
            .unwrap();
    }
    ds
}
