//! Shape catalog.
//!
//! Shapes are immutable block patterns inside a bounding box. Cells are
//! stored in row-major order relative to the top-left corner of the box, with
//! `y` growing downward like the playfield.
pub mod factory;

use arrayvec::ArrayVec;

use crate::state::{BoundsError, Dimension, Point};

pub use factory::{FixedShapeFactory, RandomShapeFactory, ShapeFactory};

/// Upper bound on occupied cells of any catalog shape.
pub const MAX_SHAPE_CELLS: usize = 4;

pub type ShapeCells = ArrayVec<Point, MAX_SHAPE_CELLS>;

/// Identity of a catalog shape.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ShapeKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::L,
    ];

    /// Bounding box and occupied cells, row-major.
    const fn pattern(self) -> (Dimension, [(i32, i32); MAX_SHAPE_CELLS]) {
        match self {
            ShapeKind::I => (Dimension::new(4, 1), [(0, 0), (1, 0), (2, 0), (3, 0)]),
            ShapeKind::O => (Dimension::new(2, 2), [(0, 0), (1, 0), (0, 1), (1, 1)]),
            ShapeKind::T => (Dimension::new(3, 2), [(0, 0), (1, 0), (2, 0), (1, 1)]),
            ShapeKind::S => (Dimension::new(3, 2), [(1, 0), (2, 0), (0, 1), (1, 1)]),
            ShapeKind::Z => (Dimension::new(3, 2), [(0, 0), (1, 0), (1, 1), (2, 1)]),
            ShapeKind::J => (Dimension::new(3, 2), [(0, 0), (0, 1), (1, 1), (2, 1)]),
            ShapeKind::L => (Dimension::new(3, 2), [(2, 0), (0, 1), (1, 1), (2, 1)]),
        }
    }

    pub fn shape(self) -> Shape {
        Shape::of(self)
    }
}

/// Immutable block pattern: a bounding box plus the cells it occupies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    kind: ShapeKind,
    dimension: Dimension,
    cells: ShapeCells,
}

impl Shape {
    pub fn of(kind: ShapeKind) -> Self {
        let (dimension, offsets) = kind.pattern();
        let cells = offsets.into_iter().map(Point::from).collect();
        Self {
            kind,
            dimension,
            cells,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn width(&self) -> u32 {
        self.dimension.width
    }

    pub fn height(&self) -> u32 {
        self.dimension.height
    }

    /// Relative occupied cells in row-major order.
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether the relative cell `(x, y)` of the bounding box is filled.
    pub fn is_occupied(&self, x: i32, y: i32) -> Result<bool, BoundsError> {
        let point = Point::new(x, y);
        if !self.dimension.contains(point) {
            return Err(BoundsError {
                x,
                y,
                dimension: self.dimension,
            });
        }
        Ok(self.cells.contains(&point))
    }

    /// Absolute cells when the bounding box's top-left corner sits at `origin`.
    pub fn footprint_at(&self, origin: Point) -> Vec<Point> {
        self.cells
            .iter()
            .map(|cell| origin.offset(cell.x, cell.y))
            .collect()
    }
}

impl From<ShapeKind> for Shape {
    fn from(kind: ShapeKind) -> Self {
        Self::of(kind)
    }
}
