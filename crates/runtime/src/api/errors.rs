//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the command processor, the subscriber registry, and
//! the periodic mover so clients can bubble them up with consistent context.
use thiserror::Error;

use tetris_core::{BoundsError, CommandError};

use super::handle::SubscriberId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid argument `{argument}`: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("command processor is closed")]
    ProcessorClosed,

    /// The processor is terminal while subscribers are still registered.
    ///
    /// This is a lifecycle defect, never a normal runtime condition.
    #[error("game is shut down but {subscribers} subscriber(s) are still registered")]
    IllegalLifecycleState { subscribers: usize },

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error("handles of subscriber {subscriber} have been revoked")]
    Revoked { subscriber: SubscriberId },

    #[error("periodic mover join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    pub(crate) fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// True for errors that end a producer's session rather than one request.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ProcessorClosed | Self::Revoked { .. })
    }
}

impl From<CommandError> for RuntimeError {
    fn from(error: CommandError) -> Self {
        Self::invalid_argument("to_positions", error.to_string())
    }
}
