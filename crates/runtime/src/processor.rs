//! Serialized execution of [`MoveCommand`]s.
//!
//! The processor runs commands on the caller's thread while holding the
//! [`GameState`] lock, so `apply_move` calls form one total order. The
//! lifecycle check is made once per session, right after the lock is taken:
//! a session opened before shutdown began may finish all of its commands,
//! and once `shutdown` returns no further command can reach the playfield.
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, MutexGuard};

use tracing::{debug, info, trace};

use tetris_core::{Dimension, MoveCommand, Playfield, Point, Shape};

use crate::api::{Result, RuntimeError};
use crate::logger::GridLogger;
use crate::state::GameState;

/// Lifecycle of a [`CommandProcessor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProcessorStatus {
    Running = 0,
    ShuttingDown = 1,
    Shutdown = 2,
}

impl ProcessorStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Running,
            1 => Self::ShuttingDown,
            _ => Self::Shutdown,
        }
    }
}

impl fmt::Display for ProcessorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Running => "running",
            Self::ShuttingDown => "shutting down",
            Self::Shutdown => "shut down",
        };
        write!(f, "{}", label)
    }
}

struct ProcessorInner {
    state: GameState,
    status: AtomicU8,
    logger: Option<Arc<dyn GridLogger>>,
}

/// Cloneable handle that accepts commands while running.
#[derive(Clone)]
pub struct CommandProcessor {
    inner: Arc<ProcessorInner>,
}

impl fmt::Debug for CommandProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandProcessor")
            .field("status", &self.status())
            .field("logger", &self.inner.logger.is_some())
            .finish()
    }
}

impl CommandProcessor {
    pub fn new(state: GameState) -> Self {
        Self::build(state, None)
    }

    /// Processor that pushes the grid to `logger` after every applied move.
    pub fn with_logger(state: GameState, logger: Arc<dyn GridLogger>) -> Self {
        Self::build(state, Some(logger))
    }

    fn build(state: GameState, logger: Option<Arc<dyn GridLogger>>) -> Self {
        Self {
            inner: Arc::new(ProcessorInner {
                state,
                status: AtomicU8::new(ProcessorStatus::Running as u8),
                logger,
            }),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.inner.state
    }

    pub fn status(&self) -> ProcessorStatus {
        ProcessorStatus::from_u8(self.inner.status.load(Ordering::Acquire))
    }

    pub fn is_shutdown(&self) -> bool {
        self.status() == ProcessorStatus::Shutdown
    }

    /// Executes `command` against the game state.
    ///
    /// Fails with [`RuntimeError::ProcessorClosed`] once shutdown has begun.
    pub fn schedule_command(&self, command: MoveCommand) -> Result<()> {
        self.exclusive(|session| session.schedule_command(command))
    }

    /// Runs `f` with exclusive access to the game state.
    ///
    /// Commands scheduled through the session execute immediately under the
    /// same lock, so a producer can read, decide, and submit without any
    /// other mutation interleaving. Must not be re-entered from inside `f`.
    pub fn exclusive<R>(&self, f: impl FnOnce(&mut ExclusiveSession<'_>) -> R) -> R {
        let field = self.inner.state.lock();
        let accepting = self.status() == ProcessorStatus::Running;
        let mut session = ExclusiveSession {
            processor: &self.inner,
            field,
            accepting,
        };
        f(&mut session)
    }

    /// Stops accepting commands and waits for an in-flight session to finish.
    ///
    /// Idempotent. Must not be called while holding an [`ExclusiveSession`].
    pub fn shutdown(&self) {
        if self.is_shutdown() {
            return;
        }

        let began = self
            .inner
            .status
            .compare_exchange(
                ProcessorStatus::Running as u8,
                ProcessorStatus::ShuttingDown as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if began {
            debug!("command processor shutting down");
        }

        // Sessions opened while running hold this lock until they are done.
        drop(self.inner.state.lock());

        self.inner
            .status
            .store(ProcessorStatus::Shutdown as u8, Ordering::Release);
        if began {
            info!("command processor shut down");
        }
    }
}

/// Exclusive access to the game state granted by [`CommandProcessor::exclusive`].
pub struct ExclusiveSession<'a> {
    processor: &'a ProcessorInner,
    field: MutexGuard<'a, Playfield>,
    accepting: bool,
}

impl ExclusiveSession<'_> {
    pub fn playfield(&self) -> &Playfield {
        &self.field
    }

    pub fn current_shape(&self) -> Option<&Shape> {
        self.field.current_shape()
    }

    pub fn current_positions(&self) -> Option<&[Point]> {
        self.field.current_positions()
    }

    pub fn dimension(&self) -> Dimension {
        self.field.dimension()
    }

    /// Applies `command` now, inside this session.
    ///
    /// Fails with [`RuntimeError::ProcessorClosed`] if shutdown had begun
    /// before the session was opened.
    pub fn schedule_command(&mut self, command: MoveCommand) -> Result<()> {
        if !self.accepting {
            return Err(RuntimeError::ProcessorClosed);
        }

        let shape = command.shape().kind();
        let cells = command.to_positions().len();
        command.apply(&mut self.field)?;
        trace!(
            %shape,
            cells,
            revision = self.field.revision(),
            "move applied"
        );

        if let Some(logger) = &self.processor.logger
            && let Err(error) = logger.log_state(self.field.grid())
        {
            debug!(%error, "grid dump failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use tetris_core::{Cell, Grid, ShapeKind};

    fn processor() -> CommandProcessor {
        CommandProcessor::new(GameState::new(Dimension::new(10, 20)))
    }

    fn command(from: &[(i32, i32)], to: &[(i32, i32)]) -> MoveCommand {
        let from: Vec<Point> = from.iter().copied().map(Point::from).collect();
        let to: Vec<Point> = to.iter().copied().map(Point::from).collect();
        MoveCommand::new(Shape::of(ShapeKind::O), from, &to).unwrap()
    }

    #[test]
    fn commands_apply_in_submission_order() {
        let processor = processor();
        processor.schedule_command(command(&[], &[(5, 0)])).unwrap();
        processor
            .schedule_command(command(&[(5, 0)], &[(5, 1)]))
            .unwrap();

        let snapshot = processor.state().snapshot();
        assert_eq!(snapshot.positions, Some(vec![Point::new(5, 1)]));
        assert_eq!(snapshot.revision, 2);
        assert_eq!(snapshot.occupied_cells(), 1);
    }

    #[test]
    fn shutdown_rejects_new_commands() {
        let processor = processor();
        assert_eq!(processor.status(), ProcessorStatus::Running);
        processor.shutdown();
        assert!(processor.is_shutdown());

        let err = processor
            .schedule_command(command(&[], &[(0, 0)]))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ProcessorClosed));
        assert_eq!(processor.state().revision(), 0);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let processor = processor();
        processor.shutdown();
        processor.shutdown();
        assert_eq!(processor.status(), ProcessorStatus::Shutdown);
    }

    #[test]
    fn bounds_error_is_surfaced_and_state_kept() {
        let processor = processor();
        processor.schedule_command(command(&[], &[(9, 19)])).unwrap();
        let err = processor
            .schedule_command(command(&[(9, 19)], &[(9, 20)]))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Bounds(_)));
        assert_eq!(
            processor.state().current_positions(),
            Some(vec![Point::new(9, 19)])
        );
    }

    #[test]
    fn exclusive_session_sees_its_own_moves() {
        let processor = processor();
        let seen = processor.exclusive(|session| {
            assert!(session.current_positions().is_none());
            session.schedule_command(command(&[], &[(2, 2)])).unwrap();
            session.current_positions().map(<[Point]>::to_vec)
        });
        assert_eq!(seen, Some(vec![Point::new(2, 2)]));
    }

    struct FailingLogger {
        calls: Mutex<usize>,
    }

    impl GridLogger for FailingLogger {
        fn log_state(&self, _grid: &Grid<Cell>) -> io::Result<()> {
            *self.calls.lock().unwrap() += 1;
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn logger_failures_are_swallowed() {
        let logger = Arc::new(FailingLogger {
            calls: Mutex::new(0),
        });
        let processor =
            CommandProcessor::with_logger(GameState::new(Dimension::new(10, 20)), logger.clone());

        processor.schedule_command(command(&[], &[(1, 1)])).unwrap();
        processor
            .schedule_command(command(&[(1, 1)], &[(1, 2)]))
            .unwrap();

        assert_eq!(*logger.calls.lock().unwrap(), 2);
        assert_eq!(processor.state().revision(), 2);
    }
}
