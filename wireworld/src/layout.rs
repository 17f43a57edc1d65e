use crate::config::{MIN_CELL_SIZE, MIN_GRID_CELLS, MIN_GRID_SIZE};
use circuit_grid::{GridSize, Loc, Random};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where the grid's cells land in a window: square cells, centered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellLayout {
    window: PixelSize,
    cell_size: u32,
    grid_size: GridSize,
    x_border: u32,
    y_border: u32,
}

impl CellLayout {
    /// `requested_size` follows [`crate::WireConfig::size`]. Tiny windows still get a
    /// grid of at least [`MIN_GRID_CELLS`] per axis.
    pub fn new(window: PixelSize, requested_size: i32, rand: &mut Random) -> Self {
        let cell_size = Self::cell_size_for(window, requested_size, rand);
        let grid_size = GridSize::new(
            (window.width / cell_size).max(MIN_GRID_CELLS),
            (window.height / cell_size).max(MIN_GRID_CELLS),
        );
        Self {
            window,
            cell_size,
            grid_size,
            x_border: window.width.saturating_sub(cell_size * grid_size.width) / 2,
            y_border: window.height.saturating_sub(cell_size * grid_size.height) / 2,
        }
    }

    fn cell_size_for(window: PixelSize, requested_size: i32, rand: &mut Random) -> u32 {
        let fitting = MIN_CELL_SIZE.max(window.width.min(window.height) / MIN_GRID_SIZE);
        let min = MIN_CELL_SIZE as i32;
        if requested_size < -min {
            let max = requested_size.unsigned_abs().min(fitting);
            rand.next_in_range(MIN_CELL_SIZE..=max)
        } else if requested_size == 0 {
            fitting
        } else if requested_size < min {
            MIN_CELL_SIZE
        } else {
            (requested_size as u32).min(fitting)
        }
    }

    pub fn window(&self) -> PixelSize {
        self.window
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Pixels covered by an interior cell. Cells bigger than 3 pixels leave a one
    /// pixel gap on the right and bottom.
    pub fn cell_rect(&self, loc: Loc) -> PixelRect {
        debug_assert!(self.grid_size.is_interior(loc));
        let gap = u32::from(self.cell_size > 3);
        PixelRect {
            x: self.x_border + (loc.col - 1) * self.cell_size,
            y: self.y_border + (loc.row - 1) * self.cell_size,
            width: self.cell_size - gap,
            height: self.cell_size - gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: u32, height: u32, size: i32) -> CellLayout {
        CellLayout::new(PixelSize::new(width, height), size, &mut Random::from_seed(5))
    }

    #[test]
    fn explicit_size_is_capped_by_the_window() {
        assert_eq!(layout(800, 600, 8).cell_size(), 8);
        assert_eq!(layout(800, 600, 100).cell_size(), 600 / MIN_GRID_SIZE);
        assert_eq!(layout(800, 600, 1).cell_size(), MIN_CELL_SIZE);
        assert_eq!(layout(800, 600, 0).cell_size(), 25);
    }

    #[test]
    fn negative_size_is_random_within_range() {
        let mut rand = Random::from_seed(2);
        for _ in 0..50 {
            let layout = CellLayout::new(PixelSize::new(800, 600), -8, &mut rand);
            assert!((MIN_CELL_SIZE..=8).contains(&layout.cell_size()));
        }
    }

    #[test]
    fn grid_is_centered() {
        let layout = layout(805, 603, 10);
        assert_eq!(layout.grid_size(), GridSize::new(80, 60));
        let first = layout.cell_rect(Loc::new(1, 1));
        assert_eq!((first.x, first.y), (2, 1));
        assert_eq!((first.width, first.height), (9, 9));
        let last = layout.cell_rect(Loc::new(60, 80));
        assert_eq!((last.x, last.y), (2 + 790, 1 + 590));
    }

    #[test]
    fn degenerate_window_still_has_a_grid() {
        let layout = layout(0, 1, 8);
        assert_eq!(layout.cell_size(), MIN_CELL_SIZE);
        assert_eq!(layout.grid_size(), GridSize::new(MIN_GRID_CELLS, MIN_GRID_CELLS));
    }

    #[test]
    fn small_cells_have_no_gap() {
        let layout = layout(300, 300, 3);
        let rect = layout.cell_rect(Loc::new(2, 2));
        assert_eq!(rect, PixelRect { x: 3, y: 3, width: 3, height: 3 });
    }
}
