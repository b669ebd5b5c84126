use crate::shape::Shape;
use crate::state::{BoundsError, Playfield, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error("move target has no positions inside the visible grid")]
    EmptyTarget,
}

/// Keeps only the positions with both coordinates non-negative.
///
/// Cells above or left of the visible grid are dropped here so they never
/// reach the playfield.
pub fn filter_positions(positions: &[Point]) -> Vec<Point> {
    positions
        .iter()
        .copied()
        .filter(|point| point.is_non_negative())
        .collect()
}

/// One multi-cell transition of a single shape.
///
/// Built by a producer, handed to the command processor, applied exactly once
/// and dropped. `apply` takes `self` by value so a command cannot be replayed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCommand {
    shape: Shape,
    from: Vec<Point>,
    to: Vec<Point>,
}

impl MoveCommand {
    /// Builds a command, filtering `to` down to its non-negative positions.
    ///
    /// `from` is empty only for the first placement of a piece.
    pub fn new(
        shape: Shape,
        from: impl Into<Vec<Point>>,
        to: &[Point],
    ) -> Result<Self, CommandError> {
        let to = filter_positions(to);
        if to.is_empty() {
            return Err(CommandError::EmptyTarget);
        }
        Ok(Self {
            shape,
            from: from.into(),
            to,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn from_positions(&self) -> &[Point] {
        &self.from
    }

    pub fn to_positions(&self) -> &[Point] {
        &self.to
    }

    pub fn is_first_placement(&self) -> bool {
        self.from.is_empty()
    }

    pub fn apply(self, field: &mut Playfield) -> Result<(), BoundsError> {
        field.apply_move(&self.shape, &self.from, &self.to)
    }
}
