//! Elementwise application of the cell solver over a grid.
//!
//! Cells are independent, so they are solved in parallel with `rayon`. The
//! chunked strategy solves one slab of cells at a time and reports progress
//! between slabs; results are placed by cell index, so both strategies give
//! bit-identical output.

use std::ops::Range;

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;
use thiserror::Error;
use tracing::trace;
use uom::si::thermodynamic_temperature::kelvin;

use crate::support::grid::{Dataset, GridError, Shape};

use super::{
    params::{CellParams, FIELDS},
    solve::{CellTemperatures, SolveError},
};

/// How the grid is traversed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// All cells at once.
    #[default]
    InMemory,

    /// Slabs of at most `cells_per_chunk` cells, one after another.
    ///
    /// Only the solve work is split. The input dataset and both output
    /// arrays stay in memory, so peak memory is bounded by the dataset, not
    /// by the chunk size. A chunk size of zero is treated as one.
    Chunked { cells_per_chunk: usize },
}

/// Progress after a chunk has been solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    /// Zero-based index of the finished chunk.
    pub chunk: usize,
    pub chunks: usize,
    pub cells_done: usize,
    pub cells: usize,
}

/// A cell whose solve failed.
#[derive(Debug, Error)]
#[error("cell (time={}, latitude={}, longitude={}) failed", .cell[0], .cell[1], .cell[2])]
pub struct CellError {
    /// `(time, latitude, longitude)` index of the cell.
    pub cell: [usize; 3],

    #[source]
    pub source: SolveError,
}

/// The ten parameter fields of a dataset, in tuple order.
pub(crate) struct ParamFields<'a> {
    shape: Shape,
    fields: [ArrayView3<'a, f64>; 10],
}

impl<'a> ParamFields<'a> {
    /// Borrows the parameter fields of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MissingField`] for the first absent field.
    pub(crate) fn new(data: &'a Dataset) -> Result<Self, GridError> {
        let mut views = Vec::with_capacity(FIELDS.len());
        for name in FIELDS {
            views.push(data.values(name)?.view());
        }
        let fields = views.try_into().map_err(|_| GridError::MissingField {
            field: FIELDS[0].to_owned(),
        })?;
        Ok(Self {
            shape: data.shape(),
            fields,
        })
    }

    pub(crate) fn shape(&self) -> Shape {
        self.shape
    }

    pub(crate) fn len(&self) -> usize {
        self.shape.0 * self.shape.1 * self.shape.2
    }

    fn index(&self, flat: usize) -> [usize; 3] {
        let (_, ny, nx) = self.shape;
        [flat / (ny * nx), (flat / nx) % ny, flat % nx]
    }

    /// Parameters of the cell at row-major position `flat`.
    pub(crate) fn row(&self, flat: usize) -> CellParams {
        let [t, y, x] = self.index(flat);
        CellParams::from_row(std::array::from_fn(|i| self.fields[i][[t, y, x]]))
    }
}

/// Solved raw temperatures in K, one array per unknown.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolvedGrid {
    pub(crate) globe: Array3<f64>,
    pub(crate) wet_bulb: Array3<f64>,
}

/// Solves every cell of `fields`.
///
/// `progress` is called after each chunk, in chunk order.
///
/// # Errors
///
/// Returns the failure of the lowest-indexed failing cell, whatever the
/// strategy and thread scheduling.
pub(crate) fn solve_grid<F, P>(
    fields: &ParamFields<'_>,
    execution: Execution,
    solve: F,
    mut progress: P,
) -> Result<SolvedGrid, CellError>
where
    F: Fn(&CellParams) -> Result<CellTemperatures, SolveError> + Sync,
    P: FnMut(ChunkProgress),
{
    let cells = fields.len();
    let chunks = chunk_ranges(cells, execution);

    let mut solved = SolvedGrid {
        globe: Array3::from_elem(fields.shape(), f64::NAN),
        wet_bulb: Array3::from_elem(fields.shape(), f64::NAN),
    };

    for (chunk, range) in chunks.iter().enumerate() {
        let results: Vec<_> = range
            .clone()
            .into_par_iter()
            .map(|flat| solve(&fields.row(flat)))
            .collect();

        for (flat, result) in range.clone().zip(results) {
            let cell = fields.index(flat);
            let temps = result.map_err(|source| CellError { cell, source })?;
            solved.globe[cell] = temps.globe.get::<kelvin>();
            solved.wet_bulb[cell] = temps.wet_bulb.get::<kelvin>();
        }

        trace!(chunk, chunks = chunks.len(), cells = range.len(), "solved chunk");
        progress(ChunkProgress {
            chunk,
            chunks: chunks.len(),
            cells_done: range.end,
            cells,
        });
    }

    Ok(solved)
}

fn chunk_ranges(cells: usize, execution: Execution) -> Vec<Range<usize>> {
    let size = match execution {
        Execution::InMemory => cells.max(1),
        Execution::Chunked { cells_per_chunk } => cells_per_chunk.max(1),
    };
    (0..cells)
        .step_by(size)
        .map(|start| start..(start + size).min(cells))
        .collect()
}
