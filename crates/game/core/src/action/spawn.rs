//! Spawn and descent geometry for the active piece.
//!
//! A new piece starts with its bounding box's top row at `-(height - 1)`, so
//! only its bottom row touches the visible grid. [`EntryPath`] then yields the
//! filtered footprint one row at a time until the whole shape is visible.

use crate::shape::Shape;
use crate::state::{Dimension, Point};

use super::movement::filter_positions;

/// Top-left corner of a freshly spawned shape's bounding box.
pub fn spawn_origin(shape: &Shape, spawn_column: i32) -> Point {
    Point::new(spawn_column, -(shape.height() as i32 - 1))
}

/// Full, unfiltered footprint of a freshly spawned shape.
pub fn spawn_footprint(shape: &Shape, spawn_column: i32) -> Vec<Point> {
    shape.footprint_at(spawn_origin(shape, spawn_column))
}

/// Whether a shape spawned at `spawn_column` lies within the grid's columns.
pub fn spawn_fits(shape: &Shape, spawn_column: i32, dimension: Dimension) -> bool {
    spawn_column >= 0 && spawn_column as i64 + shape.width() as i64 <= dimension.width as i64
}

/// Every position shifted one row down.
pub fn shift_down(positions: &[Point]) -> Vec<Point> {
    positions.iter().map(|point| point.below()).collect()
}

/// Whether every shifted position still fits the grid.
pub fn can_descend(positions: &[Point], dimension: Dimension) -> bool {
    positions
        .iter()
        .all(|point| dimension.contains(point.below()))
}

/// Successive visible footprints of a piece entering the grid.
///
/// Each item is the filtered footprint to submit. The first item is the
/// unshifted spawn footprint; each later one is shifted a row further down.
/// The last item is the first one whose length equals the shape's full cell
/// count; the iterator ends after it. Callers check [`spawn_fits`] first, or
/// a footprint cut off at the left edge never becomes complete.
#[derive(Debug, Clone)]
pub struct EntryPath {
    footprint: Vec<Point>,
    done: bool,
}

impl EntryPath {
    pub fn new(shape: &Shape, spawn_column: i32) -> Self {
        Self {
            footprint: spawn_footprint(shape, spawn_column),
            done: false,
        }
    }
}

impl Iterator for EntryPath {
    type Item = Vec<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let visible = filter_positions(&self.footprint);
        if visible.len() == self.footprint.len() {
            self.done = true;
        } else {
            self.footprint = shift_down(&self.footprint);
        }
        Some(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    fn points(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn spawn_footprint_stays_in_spawn_columns_and_above_row_one() {
        let spawn_column = 5;
        for kind in ShapeKind::ALL {
            let shape = Shape::of(kind);
            let footprint = spawn_footprint(&shape, spawn_column);
            assert_eq!(footprint.len(), shape.occupied_count());
            for point in &footprint {
                assert!(point.x >= spawn_column, "{kind} {point}");
                assert!(point.x < spawn_column + shape.width() as i32, "{kind} {point}");
                assert!(point.y <= 0, "{kind} {point}");
            }
        }
    }

    #[test]
    fn o_shape_enters_in_two_steps() {
        let steps: Vec<_> = EntryPath::new(&Shape::of(ShapeKind::O), 5).collect();
        assert_eq!(
            steps,
            vec![
                points(&[(5, 0), (6, 0)]),
                points(&[(5, 0), (6, 0), (5, 1), (6, 1)]),
            ]
        );
    }

    #[test]
    fn entry_terminates_within_shape_height() {
        for kind in ShapeKind::ALL {
            let shape = Shape::of(kind);
            let steps: Vec<_> = EntryPath::new(&shape, 3).collect();
            assert!(!steps.is_empty());
            assert!(steps.len() <= shape.height() as usize, "{kind}");
            assert_eq!(steps.last().map(Vec::len), Some(shape.occupied_count()));
            assert!(steps.iter().all(|step| !step.is_empty()), "{kind}");
        }
    }

    #[test]
    fn flat_shape_enters_at_once() {
        let steps: Vec<_> = EntryPath::new(&Shape::of(ShapeKind::I), 5).collect();
        assert_eq!(steps, vec![points(&[(5, 0), (6, 0), (7, 0), (8, 0)])]);
    }

    #[test]
    fn spawn_column_must_keep_the_shape_inside() {
        let dim = Dimension::new(10, 20);
        let o = Shape::of(ShapeKind::O);
        let i = Shape::of(ShapeKind::I);
        assert!(spawn_fits(&o, 0, dim));
        assert!(spawn_fits(&o, 8, dim));
        assert!(!spawn_fits(&o, 9, dim));
        assert!(!spawn_fits(&o, -1, dim));
        assert!(spawn_fits(&i, 6, dim));
        assert!(!spawn_fits(&i, 7, dim));
    }

    #[test]
    fn descent_stops_at_the_floor() {
        let dim = Dimension::new(10, 4);
        assert!(can_descend(&points(&[(0, 2)]), dim));
        assert!(!can_descend(&points(&[(0, 2), (0, 3)]), dim));
        assert_eq!(shift_down(&points(&[(1, 1)])), points(&[(1, 2)]));
    }
}
