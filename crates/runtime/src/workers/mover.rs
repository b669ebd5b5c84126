//! Periodic mover that drives the active piece downward.
//!
//! Each firing takes exclusive access to the game state for its whole step:
//! it picks a shape if none is active, walks a new shape into view one row at
//! a time, or shifts a placed shape down one row. Stopping the task only
//! prevents future firings; a firing never contains an await point, so it
//! always runs to completion.
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use tetris_core::{
    Dimension, EntryPath, MoveCommand, Point, Shape, ShapeFactory, ShapeKind, can_descend,
    shift_down, spawn_fits,
};

use crate::api::{Result, RuntimeError, SubscriberHandles};
use crate::processor::ExclusiveSession;

/// Timing of a [`PeriodicMover`]. Placement comes from the game's config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoverConfig {
    pub interval: Duration,
}

impl MoverConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// What one firing did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Firing {
    /// A new shape entered the grid; one command per step, in order.
    Spawned {
        shape: ShapeKind,
        steps: Vec<Vec<Point>>,
    },
    /// The placed shape moved one row down.
    Descended {
        shape: ShapeKind,
        from: Vec<Point>,
        to: Vec<Point>,
    },
    /// The placed shape is on the floor; nothing was submitted.
    Resting { shape: ShapeKind },
}

impl Firing {
    /// Number of commands submitted.
    pub fn commands(&self) -> usize {
        match self {
            Firing::Spawned { steps, .. } => steps.len(),
            Firing::Descended { .. } => 1,
            Firing::Resting { .. } => 0,
        }
    }
}

/// Timer-driven producer of moves for the active piece.
pub struct PeriodicMover {
    handles: SubscriberHandles,
    factory: Box<dyn ShapeFactory>,
    spawn_column: i32,
    config: MoverConfig,
}

impl PeriodicMover {
    /// Fails with [`RuntimeError::InvalidArgument`] if `spawn_column` is
    /// outside the grid.
    pub fn new(
        handles: SubscriberHandles,
        factory: impl ShapeFactory + 'static,
        spawn_column: i32,
        config: MoverConfig,
    ) -> Result<Self> {
        let width = handles.state()?.dimension().width;
        if spawn_column < 0 || spawn_column as i64 >= width as i64 {
            return Err(RuntimeError::invalid_argument(
                "spawn_column",
                format!("column {spawn_column} is outside a grid {width} wide"),
            ));
        }
        Ok(Self {
            handles,
            factory: Box::new(factory),
            spawn_column,
            config,
        })
    }

    pub fn spawn_column(&self) -> i32 {
        self.spawn_column
    }

    pub fn config(&self) -> &MoverConfig {
        &self.config
    }

    /// Performs one firing synchronously.
    pub fn fire(&mut self) -> Result<Firing> {
        let processor = self.handles.processor()?;
        let factory = self.factory.as_mut();
        let spawn_column = self.spawn_column;
        processor.exclusive(|session| fire_locked(session, factory, spawn_column))
    }

    /// Runs the mover on a tokio task, firing every `interval`.
    ///
    /// The first firing happens immediately. The loop ends on
    /// [`MoverTask::stop`], when the task handle is dropped, or when the
    /// processor closes or the handles are revoked.
    pub fn spawn(self) -> MoverTask {
        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(stop_rx));
        MoverTask { stop_tx, join }
    }

    async fn run(mut self, mut stop_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            subscriber = %self.handles.id(),
            interval_ms = self.config.interval.as_millis() as u64,
            "periodic mover started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                    continue;
                }
            }

            match self.fire() {
                Ok(firing) => trace!(?firing, "firing complete"),
                Err(error) if error.is_terminal() => {
                    debug!(%error, "periodic mover can no longer submit");
                    break;
                }
                Err(error) => warn!(%error, "firing aborted"),
            }
        }

        info!(subscriber = %self.handles.id(), "periodic mover stopped");
    }
}

fn fire_locked(
    session: &mut ExclusiveSession<'_>,
    factory: &mut dyn ShapeFactory,
    spawn_column: i32,
) -> Result<Firing> {
    let shape = match session.current_shape() {
        Some(shape) => shape.clone(),
        None => {
            let shape = factory.next_shape();
            debug!(shape = %shape.kind(), "spawning shape");
            shape
        }
    };

    let Some(current) = session.current_positions().map(<[Point]>::to_vec) else {
        check_spawn(&shape, spawn_column, session.dimension())?;
        let mut steps = Vec::new();
        for visible in EntryPath::new(&shape, spawn_column) {
            let from = session
                .current_positions()
                .map(<[Point]>::to_vec)
                .unwrap_or_default();
            session.schedule_command(MoveCommand::new(shape.clone(), from, &visible)?)?;
            steps.push(visible);
        }
        return Ok(Firing::Spawned {
            shape: shape.kind(),
            steps,
        });
    };

    if !can_descend(&current, session.dimension()) {
        return Ok(Firing::Resting { shape: shape.kind() });
    }

    let to = shift_down(&current);
    session.schedule_command(MoveCommand::new(shape.clone(), current.clone(), &to)?)?;
    Ok(Firing::Descended {
        shape: shape.kind(),
        from: current,
        to,
    })
}

fn check_spawn(shape: &Shape, spawn_column: i32, dimension: Dimension) -> Result<()> {
    if spawn_fits(shape, spawn_column, dimension) {
        return Ok(());
    }
    Err(RuntimeError::invalid_argument(
        "spawn_column",
        format!(
            "{} at column {spawn_column} does not fit a grid {} wide",
            shape.kind(),
            dimension.width
        ),
    ))
}

/// Running mover task.
pub struct MoverTask {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl MoverTask {
    /// Prevents future firings. An in-flight firing completes.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the task to exit.
    pub async fn join(self) -> Result<()> {
        self.join.await.map_err(RuntimeError::WorkerJoin)
    }

    /// Stops the task and waits for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.stop();
        self.join().await
    }
}
