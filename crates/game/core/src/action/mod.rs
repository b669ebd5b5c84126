//! Move commands and the geometry that produces them.
//!
//! Producers compute target footprints with [`spawn`] helpers, wrap them in a
//! [`MoveCommand`], and hand the command to whatever serializes execution.
pub mod movement;
pub mod spawn;

pub use movement::{CommandError, MoveCommand, filter_positions};
pub use spawn::{
    EntryPath, can_descend, shift_down, spawn_fits, spawn_footprint, spawn_origin,
};
