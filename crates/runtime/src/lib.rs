//! Concurrent runtime for the falling-block command engine.
//!
//! This crate shares one [`GameState`] between a serialized
//! [`CommandProcessor`], a timer-driven [`PeriodicMover`], and any number of
//! polling subscribers. Consumers embed [`Game`] to register subscribers and to
//! coordinate shutdown.
//!
//! Modules are organized by responsibility:
//! - [`game`] hosts the facade and builder
//! - [`api`] exposes errors and subscriber handles
//! - [`processor`] and [`state`] serialize every mutation behind one lock
//! - [`logger`] renders the optional debug grid dump
//! - `workers` keeps the periodic mover internal to the crate
pub mod api;
pub mod game;
pub mod logger;
pub mod processor;
pub mod state;

mod workers;

pub use api::{Result, RuntimeError, SubscriberHandles, SubscriberId};
pub use game::{Game, GameBuilder};
pub use logger::{FileGridLogger, GridLogger, render_grid_dump};
pub use processor::{CommandProcessor, ExclusiveSession, ProcessorStatus};
pub use state::{GameSnapshot, GameState};
pub use workers::{Firing, MoverConfig, MoverTask, PeriodicMover};
