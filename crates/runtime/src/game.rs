//! Game facade.
//!
//! [`Game`] owns the shared state and the command processor, registers
//! subscribers, and coordinates shutdown. Use [`GameBuilder`] to configure the
//! grid and an optional debug grid logger.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use tetris_core::{GameConfig, ShapeFactory};

use crate::api::{Result, RuntimeError, SubscriberHandles, SubscriberId};
use crate::logger::GridLogger;
use crate::processor::{CommandProcessor, ProcessorStatus};
use crate::state::GameState;
use crate::workers::{MoverConfig, MoverTask, PeriodicMover};

type Subscribers = BTreeMap<SubscriberId, SubscriberHandles>;

/// Running game and its subscriber registry.
pub struct Game {
    config: GameConfig,
    state: GameState,
    processor: CommandProcessor,
    subscribers: Mutex<Subscribers>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("processor", &self.processor)
            .field("subscribers", &self.subscribers())
            .finish()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn new(config: GameConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn processor(&self) -> &CommandProcessor {
        &self.processor
    }

    /// Registers `id` and grants it processor and state handles.
    ///
    /// Subscribing an id that is already registered revokes its previous
    /// handles.
    pub fn subscribe(&self, id: &str) -> Result<SubscriberHandles> {
        let id = SubscriberId::new(id)?;
        let mut subscribers = self.lock_subscribers();
        if self.processor.status() != ProcessorStatus::Running {
            return Err(RuntimeError::ProcessorClosed);
        }

        let handles =
            SubscriberHandles::new(id.clone(), self.processor.clone(), self.state.clone());
        if let Some(previous) = subscribers.insert(id.clone(), handles.clone()) {
            previous.revoke();
            debug!(subscriber = %id, "subscriber re-registered");
        } else {
            debug!(subscriber = %id, "subscriber registered");
        }
        Ok(handles)
    }

    /// Revokes the handles of `id` and forgets it. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: &str) -> Result<()> {
        let id = SubscriberId::new(id)?;
        match self.lock_subscribers().remove(&id) {
            Some(handles) => {
                handles.revoke();
                debug!(subscriber = %id, "subscriber removed");
            }
            None => debug!(subscriber = %id, "unsubscribe of unknown subscriber"),
        }
        Ok(())
    }

    /// Ids of the current subscribers, in order.
    pub fn subscribers(&self) -> Vec<SubscriberId> {
        self.lock_subscribers().keys().cloned().collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    /// Subscribes `id` as a periodic mover without starting it.
    ///
    /// New shapes spawn at the configured spawn column. A column outside the
    /// grid is rejected before `id` is registered.
    pub fn mover(
        &self,
        id: &str,
        factory: impl ShapeFactory + 'static,
        config: MoverConfig,
    ) -> Result<PeriodicMover> {
        let spawn_column = self.config.spawn_column;
        let width = self.config.dimension.width;
        if spawn_column < 0 || spawn_column as i64 >= width as i64 {
            return Err(RuntimeError::invalid_argument(
                "spawn_column",
                format!("column {spawn_column} is outside a grid {width} wide"),
            ));
        }
        let handles = self.subscribe(id)?;
        PeriodicMover::new(handles, factory, spawn_column, config)
    }

    /// Subscribes `id` as a periodic mover and starts it on the tokio runtime.
    pub fn spawn_mover(
        &self,
        id: &str,
        factory: impl ShapeFactory + 'static,
        config: MoverConfig,
    ) -> Result<MoverTask> {
        let mover = self.mover(id, factory, config)?;
        debug!(subscriber = id, "spawning periodic mover");
        Ok(mover.spawn())
    }

    /// Revokes every subscriber, then shuts the processor down. Idempotent.
    pub fn shutdown(&self) {
        let mut subscribers = self.lock_subscribers();
        let revoked = subscribers.len();
        for handles in subscribers.values() {
            handles.revoke();
        }
        subscribers.clear();

        let was_running = !self.processor.is_shutdown();
        self.processor.shutdown();
        if was_running {
            info!(revoked, "game shut down");
        }
    }

    /// Whether the processor has reached its terminal state.
    ///
    /// A terminal processor with registered subscribers is reported as
    /// [`RuntimeError::IllegalLifecycleState`].
    pub fn is_shutdown(&self) -> Result<bool> {
        let subscribers = self.lock_subscribers();
        let terminal = self.processor.is_shutdown();
        if terminal && !subscribers.is_empty() {
            return Err(RuntimeError::IllegalLifecycleState {
                subscribers: subscribers.len(),
            });
        }
        Ok(terminal)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`Game`].
#[derive(Default)]
pub struct GameBuilder {
    config: GameConfig,
    logger: Option<Arc<dyn GridLogger>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Pushes the grid to `logger` after every applied move.
    pub fn grid_logger(mut self, logger: Arc<dyn GridLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> Game {
        let state = GameState::new(self.config.dimension);
        let processor = match self.logger {
            Some(logger) => CommandProcessor::with_logger(state.clone(), logger),
            None => CommandProcessor::new(state.clone()),
        };
        debug!(
            dimension = %self.config.dimension,
            spawn_column = self.config.spawn_column,
            "game created"
        );
        Game {
            config: self.config,
            state,
            processor,
            subscribers: Mutex::new(Subscribers::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_core::{Dimension, FixedShapeFactory, Point, ShapeKind};

    use crate::workers::Firing;

    fn ids(game: &Game) -> Vec<String> {
        game.subscribers()
            .iter()
            .map(|id| id.as_str().to_owned())
            .collect()
    }

    #[test]
    fn missing_subscriber_id_is_rejected() {
        let game = Game::default();
        assert!(matches!(
            game.subscribe(""),
            Err(RuntimeError::InvalidArgument { .. })
        ));
        assert!(matches!(
            game.unsubscribe(""),
            Err(RuntimeError::InvalidArgument { .. })
        ));
        assert_eq!(game.subscriber_count(), 0);
    }

    #[test]
    fn resubscribe_revokes_previous_handles() {
        let game = Game::default();
        let first = game.subscribe("a").unwrap();
        let second = game.subscribe("a").unwrap();

        assert!(first.is_revoked());
        assert!(!second.is_revoked());
        assert_eq!(ids(&game), ["a"]);
    }

    #[test]
    fn unsubscribe_of_unknown_id_is_a_no_op() {
        let game = Game::default();
        game.subscribe("b").unwrap();
        game.unsubscribe("a").unwrap();
        assert_eq!(ids(&game), ["b"]);
    }

    #[test]
    fn subscribe_after_shutdown_is_rejected() {
        let game = Game::default();
        game.shutdown();
        assert!(matches!(
            game.subscribe("a"),
            Err(RuntimeError::ProcessorClosed)
        ));
        assert!(game.is_shutdown().unwrap());
    }

    #[test]
    fn terminal_processor_with_subscribers_is_illegal() {
        let game = Game::default();
        let handles = SubscriberHandles::new(
            SubscriberId::new("stale").unwrap(),
            game.processor.clone(),
            game.state.clone(),
        );
        game.processor.shutdown();
        game.lock_subscribers()
            .insert(handles.id().clone(), handles);

        assert!(matches!(
            game.is_shutdown(),
            Err(RuntimeError::IllegalLifecycleState { subscribers: 1 })
        ));
    }

    #[test]
    fn mover_is_registered_as_subscriber() {
        let game = Game::new(
            GameConfig::new()
                .with_dimension(Dimension::new(6, 8))
                .with_spawn_column(1),
        );
        let mut mover = game
            .mover(
                "mover",
                FixedShapeFactory::repeating(ShapeKind::I),
                MoverConfig::default(),
            )
            .unwrap();
        assert_eq!(ids(&game), ["mover"]);

        mover.fire().unwrap();
        assert_eq!(game.state().revision(), 1);
        assert_eq!(mover.spawn_column(), 1);

        game.shutdown();
        assert_eq!(game.processor().status(), ProcessorStatus::Shutdown);
        assert!(matches!(mover.fire(), Err(RuntimeError::Revoked { .. })));
    }

    #[test]
    fn mover_spawns_at_the_configured_column() {
        let game = Game::new(GameConfig::new().with_spawn_column(1));
        let mut mover = game
            .mover(
                "mover",
                FixedShapeFactory::repeating(ShapeKind::O),
                MoverConfig::default(),
            )
            .unwrap();

        let firing = mover.fire().unwrap();

        let Firing::Spawned { steps, .. } = &firing else {
            panic!("expected a spawn, got {firing:?}");
        };
        assert_eq!(
            steps.last().cloned(),
            Some(vec![
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(1, 1),
                Point::new(2, 1),
            ])
        );
    }

    #[test]
    fn mover_with_spawn_column_outside_grid_is_not_registered() {
        for column in [-1, 10] {
            let game = Game::new(GameConfig::new().with_spawn_column(column));
            let result = game.mover(
                "mover",
                FixedShapeFactory::repeating(ShapeKind::O),
                MoverConfig::default(),
            );
            assert!(matches!(
                result,
                Err(RuntimeError::InvalidArgument {
                    argument: "spawn_column",
                    ..
                })
            ));
            assert_eq!(game.subscriber_count(), 0);
            assert_eq!(game.state().revision(), 0);
        }
    }
}
