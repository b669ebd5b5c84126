//! Debug text dump of the grid.
//!
//! Each row is written as one space-prefixed `1` (occupied) or `0` (empty)
//! per column followed by a newline. The command processor pushes the grid
//! to a [`GridLogger`] after every applied move and discards any I/O error.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tetris_core::{Cell, Grid};

/// Receives the grid after each mutation.
pub trait GridLogger: Send + Sync {
    fn log_state(&self, grid: &Grid<Cell>) -> io::Result<()>;
}

/// Renders the grid in the dump format.
pub fn render_grid_dump(grid: &Grid<Cell>) -> String {
    let mut out = String::with_capacity(grid.dimension().area() * 2 + grid.height() as usize);
    for row in grid.rows() {
        for cell in row {
            out.push(' ');
            out.push(if cell.is_some() { '1' } else { '0' });
        }
        out.push('\n');
    }
    out
}

/// Rewrites a file with the latest dump on every call.
#[derive(Debug, Clone)]
pub struct FileGridLogger {
    path: PathBuf,
}

impl FileGridLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GridLogger for FileGridLogger {
    fn log_state(&self, grid: &Grid<Cell>) -> io::Result<()> {
        fs::write(&self.path, render_grid_dump(grid))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use tetris_core::{Dimension, ShapeKind};

    #[test]
    fn dump_marks_occupied_cells() {
        let mut grid = Grid::<Cell>::new(Dimension::new(3, 2));
        grid.set(1, 0, Some(ShapeKind::O)).unwrap();
        grid.set(2, 1, Some(ShapeKind::I)).unwrap();
        assert_eq!(render_grid_dump(&grid), " 0 1 0\n 0 0 1\n");
    }

    #[test]
    fn file_logger_truncates_previous_dump() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("grid.log");
        let logger = FileGridLogger::new(&path);

        let mut grid = Grid::<Cell>::new(Dimension::new(2, 2));
        grid.set(0, 0, Some(ShapeKind::T)).unwrap();
        logger.log_state(&grid).unwrap();
        grid.set(0, 0, None).unwrap();
        logger.log_state(&grid).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), " 0 0\n 0 0\n");
    }

    #[test]
    fn file_logger_reports_io_errors() {
        let temp_dir = TempDir::new().unwrap();
        let logger = FileGridLogger::new(temp_dir.path().join("missing").join("grid.log"));
        let grid = Grid::<Cell>::new(Dimension::new(1, 1));
        assert!(logger.log_state(&grid).is_err());
    }
}
