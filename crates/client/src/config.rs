//! Client configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tetris_core::{Dimension, GameConfig};
use tetris_runtime::MoverConfig;

/// Settings for one headless run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub game: GameConfig,
    pub tick: Duration,
    pub run_for: Duration,
    pub poll: Duration,
    /// Seed for the shape factory; `None` draws from the OS.
    pub seed: Option<u64>,
    /// File that receives the grid dump after every move.
    pub dump_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            tick: MoverConfig::DEFAULT_INTERVAL,
            run_for: Duration::from_secs(5),
            poll: Duration::from_millis(250),
            seed: None,
            dump_path: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TETRIS_GRID_WIDTH` / `TETRIS_GRID_HEIGHT` - Grid size (default: 10x20)
    /// - `TETRIS_SPAWN_COLUMN` - Left column of spawned shapes (default: 5)
    /// - `TETRIS_TICK_MS` - Mover interval (default: 500)
    /// - `TETRIS_RUN_MS` - How long to run before shutting down (default: 5000)
    /// - `TETRIS_POLL_MS` - Console subscriber poll interval (default: 250)
    /// - `TETRIS_SEED` - Shape sequence seed (default: random)
    /// - `TETRIS_DUMP_PATH` - Enables the grid dump file
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(read: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        let width = read_parsed::<u32>(&read, "TETRIS_GRID_WIDTH")
            .unwrap_or(GameConfig::DEFAULT_WIDTH)
            .max(1);
        let height = read_parsed::<u32>(&read, "TETRIS_GRID_HEIGHT")
            .unwrap_or(GameConfig::DEFAULT_HEIGHT)
            .max(1);
        config.game = config.game.with_dimension(Dimension::new(width, height));

        if let Some(column) = read_parsed::<i32>(&read, "TETRIS_SPAWN_COLUMN") {
            config.game = config.game.with_spawn_column(column);
        }
        if let Some(ms) = read_parsed::<u64>(&read, "TETRIS_TICK_MS") {
            config.tick = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_parsed::<u64>(&read, "TETRIS_RUN_MS") {
            config.run_for = Duration::from_millis(ms);
        }
        if let Some(ms) = read_parsed::<u64>(&read, "TETRIS_POLL_MS") {
            config.poll = Duration::from_millis(ms.max(1));
        }
        config.seed = read_parsed(&read, "TETRIS_SEED");
        config.dump_path = read("TETRIS_DUMP_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        config
    }

    pub fn mover(&self) -> MoverConfig {
        MoverConfig::new(self.tick)
    }
}

fn read_parsed<T>(read: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    read(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(config(&[]), ClientConfig::default());
        assert_eq!(config(&[]).game.dimension, Dimension::new(10, 20));
    }

    #[test]
    fn reads_all_variables() {
        let config = config(&[
            ("TETRIS_GRID_WIDTH", "12"),
            ("TETRIS_GRID_HEIGHT", "24"),
            ("TETRIS_SPAWN_COLUMN", "3"),
            ("TETRIS_TICK_MS", "100"),
            ("TETRIS_RUN_MS", "0"),
            ("TETRIS_POLL_MS", "50"),
            ("TETRIS_SEED", "42"),
            ("TETRIS_DUMP_PATH", "/tmp/grid.log"),
        ]);
        assert_eq!(config.game.dimension, Dimension::new(12, 24));
        assert_eq!(config.game.spawn_column, 3);
        assert_eq!(config.tick, Duration::from_millis(100));
        assert_eq!(config.run_for, Duration::ZERO);
        assert_eq!(config.poll, Duration::from_millis(50));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.dump_path, Some(PathBuf::from("/tmp/grid.log")));
        assert_eq!(config.mover().interval, Duration::from_millis(100));
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let config = config(&[
            ("TETRIS_GRID_WIDTH", "wide"),
            ("TETRIS_GRID_HEIGHT", "0"),
            ("TETRIS_TICK_MS", "0"),
            ("TETRIS_SEED", "-1"),
            ("TETRIS_DUMP_PATH", "  "),
        ]);
        assert_eq!(config.game.dimension, Dimension::new(10, 1));
        assert_eq!(config.tick, Duration::from_millis(1));
        assert_eq!(config.seed, None);
        assert_eq!(config.dump_path, None);
    }
}
