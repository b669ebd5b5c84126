//! Background producers that submit commands on their own schedule.
//!
//! Producers hold ordinary subscriber handles, so the game revokes them like
//! any other subscriber on `unsubscribe` or shutdown.

mod mover;

pub use mover::{Firing, MoverConfig, MoverTask, PeriodicMover};
