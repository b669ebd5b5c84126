//! Authoritative playfield state.
//!
//! This module owns the grid, the active piece, and the single mutation entry
//! point [`Playfield::apply_move`]. Runtime layers wrap a [`Playfield`] in one
//! lock and never mutate it any other way.
pub mod common;
pub mod grid;

pub use common::{Dimension, Point};
pub use grid::{BoundsError, Grid};

use crate::shape::{Shape, ShapeKind};

/// Occupancy of one playfield cell: the kind of shape holding it, if any.
pub type Cell = Option<ShapeKind>;

/// Grid, active piece, and move counter.
///
/// `current_shape` and `current_positions` are `None` until the first move of
/// a piece is applied. Once `current_positions` is present every entry lies
/// inside the grid and is marked with the current shape's kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Playfield {
    grid: Grid<Cell>,
    current_shape: Option<Shape>,
    current_positions: Option<Vec<Point>>,
    /// Number of moves applied so far.
    revision: u64,
}

impl Playfield {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            grid: Grid::new(dimension),
            current_shape: None,
            current_positions: None,
            revision: 0,
        }
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn dimension(&self) -> Dimension {
        self.grid.dimension()
    }

    pub fn current_shape(&self) -> Option<&Shape> {
        self.current_shape.as_ref()
    }

    pub fn current_positions(&self) -> Option<&[Point]> {
        self.current_positions.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Moves `shape` from `from` to `to` in one step.
    ///
    /// Cells in `from` are cleared, cells in `to` are marked with the shape's
    /// kind, and `to` becomes the current footprint. Cells already held by a
    /// different shape are overwritten.
    ///
    /// Every point is bounds-checked before any cell changes, so an error
    /// leaves the playfield untouched.
    pub fn apply_move(
        &mut self,
        shape: &Shape,
        from: &[Point],
        to: &[Point],
    ) -> Result<(), BoundsError> {
        for point in from.iter().chain(to) {
            self.grid.check(*point)?;
        }

        for point in from {
            self.grid.set_at(*point, None)?;
        }
        for point in to {
            self.grid.set_at(*point, Some(shape.kind()))?;
        }

        self.current_shape = Some(shape.clone());
        self.current_positions = Some(to.to_vec());
        self.revision += 1;
        Ok(())
    }

    /// Checks the occupancy invariant for the active piece.
    pub fn is_consistent(&self) -> bool {
        let (Some(shape), Some(positions)) = (&self.current_shape, &self.current_positions) else {
            return self.current_positions.is_none();
        };
        positions.iter().all(|point| {
            matches!(self.grid.get_at(*point), Ok(Some(kind)) if *kind == shape.kind())
        })
    }

    /// Number of occupied cells on the grid.
    pub fn occupied_cells(&self) -> usize {
        self.grid.rows().flatten().filter(|cell| cell.is_some()).count()
    }
}
