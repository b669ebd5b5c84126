//! Capability handles granted to game subscribers.
//!
//! [`SubscriberHandles`] bundle the command processor and game state for one
//! registered subscriber. Revocation flips a shared flag instead of clearing
//! fields, so a handle already held by another thread simply stops working.
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use tetris_core::MoveCommand;

use super::errors::{Result, RuntimeError};
use crate::processor::CommandProcessor;
use crate::state::{GameSnapshot, GameState};

/// Name a subscriber registers under. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RuntimeError::invalid_argument(
                "subscriber",
                "subscriber id is missing",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processor and state capabilities of one subscriber.
///
/// Clones share the revocation flag.
#[derive(Clone, Debug)]
pub struct SubscriberHandles {
    id: SubscriberId,
    processor: CommandProcessor,
    state: GameState,
    revoked: Arc<AtomicBool>,
}

impl SubscriberHandles {
    pub(crate) fn new(id: SubscriberId, processor: CommandProcessor, state: GameState) -> Self {
        Self {
            id,
            processor,
            state,
            revoked: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.load(Ordering::Acquire)
    }

    pub fn processor(&self) -> Result<&CommandProcessor> {
        self.ensure_active()?;
        Ok(&self.processor)
    }

    pub fn state(&self) -> Result<&GameState> {
        self.ensure_active()?;
        Ok(&self.state)
    }

    /// Submits a command through the granted processor.
    pub fn schedule_command(&self, command: MoveCommand) -> Result<()> {
        self.processor()?.schedule_command(command)
    }

    /// Polls the granted game state.
    pub fn snapshot(&self) -> Result<GameSnapshot> {
        Ok(self.state()?.snapshot())
    }

    pub(crate) fn revoke(&self) {
        self.revoked.store(true, Ordering::Release);
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_revoked() {
            return Err(RuntimeError::Revoked {
                subscriber: self.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_core::Dimension;

    fn handles(id: &str) -> SubscriberHandles {
        let state = GameState::new(Dimension::new(4, 4));
        let processor = CommandProcessor::new(state.clone());
        SubscriberHandles::new(SubscriberId::new(id).unwrap(), processor, state)
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(
            SubscriberId::new(""),
            Err(RuntimeError::InvalidArgument { argument: "subscriber", .. })
        ));
        assert!(SubscriberId::new("   ").is_err());
        assert_eq!(SubscriberId::new("ui").unwrap().as_str(), "ui");
    }

    #[test]
    fn revocation_is_shared_by_clones() {
        let handles = handles("renderer");
        let clone = handles.clone();
        assert!(clone.snapshot().is_ok());

        handles.revoke();

        assert!(clone.is_revoked());
        assert!(matches!(clone.state(), Err(RuntimeError::Revoked { .. })));
        assert!(matches!(clone.processor(), Err(RuntimeError::Revoked { .. })));
    }
}
