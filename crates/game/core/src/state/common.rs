use std::fmt;

/// Discrete grid position expressed in cell coordinates.
///
/// `y` grows downward: row 0 is the top visible row of the playfield and
/// negative rows lie above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the point translated by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the point one row further down.
    #[must_use]
    pub const fn below(self) -> Self {
        self.offset(0, 1)
    }

    /// True when neither axis is negative.
    #[inline]
    pub const fn is_non_negative(self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height of a rectangular area, measured in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && point.x < self.width as i32
            && point.y < self.height as i32
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_moves_one_row_down() {
        assert_eq!(Point::new(3, -1).below(), Point::new(3, 0));
    }

    #[test]
    fn dimension_contains_checks_both_axes() {
        let dim = Dimension::new(10, 20);
        assert!(dim.contains(Point::new(0, 0)));
        assert!(dim.contains(Point::new(9, 19)));
        assert!(!dim.contains(Point::new(10, 0)));
        assert!(!dim.contains(Point::new(0, 20)));
        assert!(!dim.contains(Point::new(-1, 5)));
        assert!(!dim.contains(Point::new(5, -1)));
    }
}
