//! Shared handle over the authoritative [`Playfield`].
//!
//! One mutex guards the whole playfield (grid, active shape, positions and
//! revision). Readers and the command processor both go through it, so a
//! reader sees either the state before a move or the state after it.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use tetris_core::{Cell, Dimension, Grid, Playfield, Point, Shape, ShapeKind};

use crate::logger::render_grid_dump;

/// Cloneable handle to the game state.
#[derive(Clone, Debug)]
pub struct GameState {
    inner: Arc<Mutex<Playfield>>,
}

impl GameState {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Playfield::new(dimension))),
        }
    }

    /// Acquires exclusive access to the playfield.
    ///
    /// `apply_move` never leaves the playfield half-written, so a poisoned
    /// lock still guards a consistent value and is recovered.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Playfield> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the playfield while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&Playfield) -> R) -> R {
        f(&self.lock())
    }

    pub fn current_shape(&self) -> Option<Shape> {
        self.read(|field| field.current_shape().cloned())
    }

    pub fn current_positions(&self) -> Option<Vec<Point>> {
        self.read(|field| field.current_positions().map(<[Point]>::to_vec))
    }

    pub fn dimension(&self) -> Dimension {
        self.read(Playfield::dimension)
    }

    pub fn revision(&self) -> u64 {
        self.read(Playfield::revision)
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> GameSnapshot {
        self.read(GameSnapshot::capture)
    }
}

/// Point-in-time copy of the playfield, taken under the lock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub shape: Option<ShapeKind>,
    pub positions: Option<Vec<Point>>,
    pub grid: Grid<Cell>,
    pub revision: u64,
}

impl GameSnapshot {
    pub fn capture(field: &Playfield) -> Self {
        Self {
            shape: field.current_shape().map(Shape::kind),
            positions: field.current_positions().map(<[Point]>::to_vec),
            grid: field.grid().clone(),
            revision: field.revision(),
        }
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.grid.rows().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Text dump of the grid, one line per row.
    pub fn dump(&self) -> String {
        render_grid_dump(&self.grid)
    }
}
