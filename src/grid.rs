use std::ops::Add;

/// Integer pair used for both grid cells and pixel positions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Vector2i {
    pub x: i32,
    pub y: i32,
}

impl Vector2i {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vector2i {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// Fixed playfield geometry: cell size in pixels and dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    cell_size: i32,
    width: i32,
    height: i32,
}

impl Grid {
    /// Creates a grid of `width` x `height` cells.
    ///
    /// Callers validate dimensions up front (see `GameConfig::validate`);
    /// every dimension must be positive.
    #[must_use]
    pub fn new(cell_size: u32, width: u32, height: u32) -> Self {
        debug_assert!(cell_size > 0 && width > 0 && height > 0);

        Self {
            cell_size: to_i32(cell_size),
            width: to_i32(width),
            height: to_i32(height),
        }
    }

    /// Derives the cell grid that fits a screen of the given pixel size.
    #[must_use]
    pub fn from_screen(screen_width: u32, screen_height: u32, cell_size: u32) -> Self {
        Self::new(cell_size, screen_width / cell_size, screen_height / cell_size)
    }

    #[must_use]
    pub fn cell_size(self) -> i32 {
        self.cell_size
    }

    #[must_use]
    pub fn width(self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> i32 {
        self.height
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Cell the snake starts from and returns to on reset.
    #[must_use]
    pub fn center(self) -> Vector2i {
        Vector2i::new(self.width / 2, self.height / 2)
    }

    /// Converts a pixel position into the cell containing it.
    #[must_use]
    pub fn to_cell(self, pixel: Vector2i) -> Vector2i {
        Vector2i::new(
            pixel.x.div_euclid(self.cell_size),
            pixel.y.div_euclid(self.cell_size),
        )
    }

    /// Converts a cell into the pixel position of its top-left corner.
    #[must_use]
    pub fn to_pixel(self, cell: Vector2i) -> Vector2i {
        Vector2i::new(cell.x * self.cell_size, cell.y * self.cell_size)
    }

    /// Wraps a cell onto the torus; negative coordinates re-enter from the far edge.
    #[must_use]
    pub fn wrap(self, cell: Vector2i) -> Vector2i {
        Vector2i::new(cell.x.rem_euclid(self.width), cell.y.rem_euclid(self.height))
    }

    /// Returns true when the cell lies inside the grid.
    #[must_use]
    pub fn contains(self, cell: Vector2i) -> bool {
        (0..self.width).contains(&cell.x) && (0..self.height).contains(&cell.y)
    }

    /// Iterates every cell row by row.
    pub fn cells(self) -> impl Iterator<Item = Vector2i> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Vector2i::new(x, y)))
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::{Grid, Vector2i};

    fn reference_grid() -> Grid {
        Grid::from_screen(640, 480, 20)
    }

    #[test]
    fn screen_size_divides_into_cells() {
        let grid = reference_grid();

        assert_eq!(grid.width(), 32);
        assert_eq!(grid.height(), 24);
        assert_eq!(grid.total_cells(), 768);
        assert_eq!(grid.center(), Vector2i::new(16, 12));
    }

    #[test]
    fn pixel_and_cell_conversion() {
        let grid = reference_grid();

        assert_eq!(grid.to_cell(Vector2i::new(100, 100)), Vector2i::new(5, 5));
        assert_eq!(grid.to_cell(Vector2i::new(119, 101)), Vector2i::new(5, 5));
        assert_eq!(grid.to_pixel(Vector2i::new(5, 5)), Vector2i::new(100, 100));
    }

    #[test]
    fn wrap_uses_true_modulo() {
        let grid = Grid::new(20, 10, 8);

        assert_eq!(grid.wrap(Vector2i::new(-1, 3)), Vector2i::new(9, 3));
        assert_eq!(grid.wrap(Vector2i::new(4, 8)), Vector2i::new(4, 0));
        assert_eq!(grid.wrap(Vector2i::new(10, -1)), Vector2i::new(0, 7));
        assert_eq!(grid.wrap(Vector2i::new(-21, -17)), Vector2i::new(9, 7));
    }

    #[test]
    fn every_step_from_every_cell_stays_in_bounds() {
        let grid = Grid::new(20, 7, 5);
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];

        for cell in grid.cells() {
            for direction in directions {
                let next = grid.wrap(cell + direction.delta());
                assert!(grid.contains(next), "{cell:?} + {direction:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn cells_covers_whole_grid_once() {
        let grid = Grid::new(1, 4, 3);
        let cells: Vec<_> = grid.cells().collect();

        assert_eq!(cells.len(), grid.total_cells());
        assert_eq!(cells.first(), Some(&Vector2i::new(0, 0)));
        assert_eq!(cells.last(), Some(&Vector2i::new(3, 2)));
    }
}
