//! Deterministic playfield rules and value types for the falling-block engine.
//!
//! `tetris-core` defines the grid, the shape catalog, the playfield state and
//! the move commands that mutate it. Nothing here locks or spawns threads;
//! `tetris-runtime` wraps [`Playfield`] in a single lock and drives it.
//! All state mutation flows through [`Playfield::apply_move`].
pub mod action;
pub mod config;
pub mod shape;
pub mod state;

pub use action::{
    CommandError, EntryPath, MoveCommand, can_descend, filter_positions, shift_down,
    spawn_fits, spawn_footprint, spawn_origin,
};
pub use config::GameConfig;
pub use shape::{
    FixedShapeFactory, MAX_SHAPE_CELLS, RandomShapeFactory, Shape, ShapeFactory, ShapeKind,
};
pub use state::{BoundsError, Cell, Dimension, Grid, Playfield, Point};
