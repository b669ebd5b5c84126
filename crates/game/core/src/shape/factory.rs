//! Shape selection for newly spawned pieces.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Shape, ShapeKind};

/// Source of the next piece to spawn.
pub trait ShapeFactory: Send {
    fn next_shape(&mut self) -> Shape;
}

/// Uniform random selection over the catalog.
#[derive(Debug, Clone)]
pub struct RandomShapeFactory {
    rng: StdRng,
}

impl RandomShapeFactory {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for reproducible runs and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomShapeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeFactory for RandomShapeFactory {
    fn next_shape(&mut self) -> Shape {
        let index = self.rng.random_range(0..ShapeKind::ALL.len());
        Shape::of(ShapeKind::ALL[index])
    }
}

/// Cycles through a fixed sequence of kinds.
#[derive(Debug, Clone)]
pub struct FixedShapeFactory {
    sequence: Vec<ShapeKind>,
    cursor: usize,
}

impl FixedShapeFactory {
    /// An empty sequence falls back to the full catalog order.
    pub fn cycle(sequence: impl IntoIterator<Item = ShapeKind>) -> Self {
        let mut sequence: Vec<ShapeKind> = sequence.into_iter().collect();
        if sequence.is_empty() {
            sequence = ShapeKind::ALL.to_vec();
        }
        Self {
            sequence,
            cursor: 0,
        }
    }

    pub fn repeating(kind: ShapeKind) -> Self {
        Self::cycle([kind])
    }
}

impl ShapeFactory for FixedShapeFactory {
    fn next_shape(&mut self) -> Shape {
        let kind = self.sequence[self.cursor % self.sequence.len()];
        self.cursor = self.cursor.wrapping_add(1);
        Shape::of(kind)
    }
}

impl<F> ShapeFactory for Box<F>
where
    F: ShapeFactory + ?Sized,
{
    fn next_shape(&mut self) -> Shape {
        (**self).next_shape()
    }
}
