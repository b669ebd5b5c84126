use crate::state::Dimension;

/// Playfield configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Grid extent in cells.
    pub dimension: Dimension,
    /// Column of the left edge of a newly spawned shape's bounding box.
    pub spawn_column: i32,
}

impl GameConfig {
    pub const DEFAULT_WIDTH: u32 = 10;
    pub const DEFAULT_HEIGHT: u32 = 20;
    pub const DEFAULT_SPAWN_COLUMN: i32 = 5;

    pub const fn new() -> Self {
        Self {
            dimension: Dimension::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT),
            spawn_column: Self::DEFAULT_SPAWN_COLUMN,
        }
    }

    pub const fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub const fn with_spawn_column(mut self, spawn_column: i32) -> Self {
        self.spawn_column = spawn_column;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
