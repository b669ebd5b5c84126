//! Bounded two-dimensional cell storage.
//!
//! [`Grid`] is generic over its cell type so the same storage backs both the
//! occupancy playfield and any auxiliary boolean masks. It performs no
//! synchronization; the runtime serializes access around it.

use super::{Dimension, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("position ({x}, {y}) is outside the {dimension} grid")]
pub struct BoundsError {
    pub x: i32,
    pub y: i32,
    pub dimension: Dimension,
}

/// Row-major grid of `T` with a fixed extent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid<T> {
    dimension: Dimension,
    cells: Vec<T>,
}

impl<T> Grid<T>
where
    T: Clone + Default,
{
    /// Creates a grid with every cell set to `T::default()`.
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            cells: vec![T::default(); dimension.area()],
        }
    }
}

impl<T> Grid<T> {
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn width(&self) -> u32 {
        self.dimension.width
    }

    pub fn height(&self) -> u32 {
        self.dimension.height
    }

    pub fn contains(&self, point: Point) -> bool {
        self.dimension.contains(point)
    }

    /// Validates that `point` lies inside the grid.
    pub fn check(&self, point: Point) -> Result<(), BoundsError> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(self.bounds_error(point.x, point.y))
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<&T, BoundsError> {
        let index = self.index_of(x, y)?;
        Ok(&self.cells[index])
    }

    pub fn set(&mut self, x: i32, y: i32, value: T) -> Result<(), BoundsError> {
        let index = self.index_of(x, y)?;
        self.cells[index] = value;
        Ok(())
    }

    pub fn get_at(&self, point: Point) -> Result<&T, BoundsError> {
        self.get(point.x, point.y)
    }

    pub fn set_at(&mut self, point: Point, value: T) -> Result<(), BoundsError> {
        self.set(point.x, point.y, value)
    }

    /// Iterates rows from top (`y = 0`) to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks_exact panics on zero; a zero-width grid simply has no rows.
        let width = (self.dimension.width as usize).max(1);
        self.cells.chunks_exact(width)
    }

    fn index_of(&self, x: i32, y: i32) -> Result<usize, BoundsError> {
        if !self.dimension.contains(Point::new(x, y)) {
            return Err(self.bounds_error(x, y));
        }
        Ok(y as usize * self.dimension.width as usize + x as usize)
    }

    fn bounds_error(&self, x: i32, y: i32) -> BoundsError {
        BoundsError {
            x,
            y,
            dimension: self.dimension,
        }
    }
}
