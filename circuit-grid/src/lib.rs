#![deny(clippy::all)]
#![forbid(unsafe_code)]

use rand::distr::uniform::{SampleRange, SampleUniform};
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::collections::TryReserveError;
use std::fmt::Debug;
use std::ops::{Index, IndexMut, RangeInclusive};
use thiserror::Error;

/// Cell buffers could not be allocated. Callers treat this as "skip the frame".
#[derive(Debug, Error)]
#[error("could not allocate {requested} grid cells")]
pub struct AllocationError {
    pub requested: usize,
    #[source]
    source: TryReserveError,
}

impl AllocationError {
    pub fn new(requested: usize, source: TryReserveError) -> Self {
        Self { requested, source }
    }
}

pub trait GridCell
where
    Self: Copy + Default + PartialEq + Debug,
{
    /// Settings the transition needs beyond the cell and its neighbors.
    type Rule;

    fn update(&self, neighborhood: &Neighborhood<Self>, rule: &Self::Rule, next_cell: &mut Self);
}

/// Two same-shaped bordered buffers. `cells` is the current generation and
/// `next_cells` the one being computed.
#[derive(Clone, Debug)]
pub struct CircuitGrid<C>
where
    C: GridCell,
{
    size: GridSize,
    bounds: BoundingBox,
    pub cells: BorderedCells<C>,
    pub next_cells: BorderedCells<C>,
}

impl<C> CircuitGrid<C>
where
    C: GridCell,
{
    pub fn new(size: GridSize) -> Result<Self, AllocationError> {
        Ok(Self {
            size,
            bounds: BoundingBox::around(size.center(), size),
            cells: BorderedCells::new(size)?,
            next_cells: BorderedCells::new(size)?,
        })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: BoundingBox) {
        assert!(bounds.is_inside(self.size));
        self.bounds = bounds;
    }

    /// Computes `next_cells` from `cells` for every location inside the bounds.
    /// Cells outside the bounds are never read or written.
    pub fn update(&mut self, rule: &C::Rule) {
        for loc in self.bounds.locs() {
            let cell = &self.cells[loc];
            let neighborhood = Neighborhood::new(&self.cells, loc);
            let next_cell = &mut self.next_cells[loc];
            cell.update(&neighborhood, rule, next_cell);
        }
    }

    /// Copies every changed cell inside the bounds from `next_cells` into `cells`,
    /// reporting each change with its new value. A cell whose report fails is left
    /// uncommitted.
    pub fn commit_next<F>(&mut self, mut on_change: F) -> Result<(), AllocationError>
    where
        F: FnMut(Loc, C) -> Result<(), AllocationError>,
    {
        for loc in self.bounds.locs() {
            let next = self.next_cells[loc];
            let cell = &mut self.cells[loc];
            if *cell != next {
                on_change(loc, next)?;
                *cell = next;
            }
        }
        Ok(())
    }

    /// Bulk `cells <- next_cells`, restricted to the bounds.
    pub fn copy_next_to_current(&mut self) {
        self.cells.copy_box_from(&self.next_cells, self.bounds);
    }

    pub fn clear(&mut self) {
        self.cells.fill(C::default());
        self.next_cells.fill(C::default());
        self.bounds = BoundingBox::around(self.size.center(), self.size);
    }
}

/// A `(width + 2) x (height + 2)` buffer whose outer ring is a sentinel border.
/// The border can be read but never written, so it keeps `C::default()` forever.
#[derive(Clone, Debug)]
pub struct BorderedCells<C>
where
    C: GridCell,
{
    cells: Vec<C>,
    size: GridSize,
}

impl<C> BorderedCells<C>
where
    C: GridCell,
{
    pub fn new(size: GridSize) -> Result<Self, AllocationError> {
        assert!(size.width != 0 && size.height != 0);
        let len = size.num_bordered_cells();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|source| AllocationError::new(len, source))?;
        cells.resize(len, C::default());
        Ok(Self { cells, size })
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &C> + Clone {
        self.cells.iter()
    }

    pub fn cell(&self, loc: Loc) -> Option<&C> {
        loc.grid_index(self.size.bordered_width(), self.size.bordered_height())
            .map(|index| &self.cells[index])
    }

    /// Interior cells only.
    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut C> {
        if !self.size.is_interior(loc) {
            return None;
        }
        loc.grid_index(self.size.bordered_width(), self.size.bordered_height())
            .map(|index| &mut self.cells[index])
    }

    pub fn loc_at(&self, index: usize) -> Loc {
        let width = self.size.bordered_width() as usize;
        Loc::new((index / width) as u32, (index % width) as u32)
    }

    pub fn copy_box_from(&mut self, source: &Self, bounds: BoundingBox) {
        debug_assert_eq!(self.size, source.size);
        let width = self.size.bordered_width() as usize;
        let (min_col, max_col) = (bounds.min.col as usize, bounds.max.col as usize);
        for row in bounds.rows() {
            let start = row as usize * width + min_col;
            let end = row as usize * width + max_col + 1;
            self.cells[start..end].copy_from_slice(&source.cells[start..end]);
        }
    }

    pub fn fill(&mut self, value: C) {
        self.cells.fill(C::default());
        for row in 1..=self.size.height {
            for col in 1..=self.size.width {
                self[Loc::new(row, col)] = value;
            }
        }
    }
}

impl<C> Index<Loc> for BorderedCells<C>
where
    C: GridCell,
{
    type Output = C;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.cell(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl<C> IndexMut<Loc> for BorderedCells<C>
where
    C: GridCell,
{
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.cell_mut(loc).unwrap_or_else(|| {
            panic!("Index_mut indices {}, {} not in the interior", loc.row, loc.col)
        })
    }
}

/// The cells around an interior location. Every neighbor of an interior cell is either
/// interior or border, so no wraparound or bounds checks are needed.
pub struct Neighborhood<'a, C>
where
    C: GridCell,
{
    cells: &'a BorderedCells<C>,
    rows: [u32; 3],
    cols: [u32; 3],
}

impl<'a, C> Neighborhood<'a, C>
where
    C: GridCell,
{
    pub fn new(cells: &'a BorderedCells<C>, center: Loc) -> Self {
        debug_assert!(cells.size().is_interior(center));
        Self {
            cells,
            rows: [center.row - 1, center.row, center.row + 1],
            cols: [center.col - 1, center.col, center.col + 1],
        }
    }

    pub fn cell(&self, row: u32, col: u32) -> &C {
        let loc = Loc::new(self.rows[row as usize], self.cols[col as usize]);
        &self.cells[loc]
    }

    /// The 8 Moore neighbors.
    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&C),
    {
        self.for_cell(0, 0, &mut f);
        self.for_cell(0, 1, &mut f);
        self.for_cell(0, 2, &mut f);

        self.for_cell(1, 0, &mut f);
        self.for_cell(1, 2, &mut f);

        self.for_cell(2, 0, &mut f);
        self.for_cell(2, 1, &mut f);
        self.for_cell(2, 2, &mut f);
    }

    /// The 4 von Neumann neighbors.
    pub fn for_orthogonal_cells<F>(&self, mut f: F)
    where
        F: FnMut(&C),
    {
        self.for_cell(0, 1, &mut f);
        self.for_cell(1, 0, &mut f);
        self.for_cell(1, 2, &mut f);
        self.for_cell(2, 1, &mut f);
    }

    fn for_cell<F>(&self, row: u32, col: u32, f: &mut F)
    where
        F: FnMut(&C),
    {
        f(self.cell(row, col));
    }
}

/// Interior dimensions, in cells. The bordered buffers are two cells larger on each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn bordered_width(&self) -> u32 {
        self.width + 2
    }

    pub fn bordered_height(&self) -> u32 {
        self.height + 2
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn num_bordered_cells(&self) -> usize {
        self.bordered_width() as usize * self.bordered_height() as usize
    }

    pub fn is_interior(&self, loc: Loc) -> bool {
        (1..=self.height).contains(&loc.row) && (1..=self.width).contains(&loc.col)
    }

    pub fn is_border(&self, loc: Loc) -> bool {
        loc.grid_index(self.bordered_width(), self.bordered_height())
            .is_some()
            && !self.is_interior(loc)
    }

    pub fn center(&self) -> Loc {
        Loc::new((self.height / 2).max(1), (self.width / 2).max(1))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn grid_index(&self, width: u32, height: u32) -> Option<usize> {
        if self.row < height && self.col < width {
            Some(self.row as usize * width as usize + self.col as usize)
        } else {
            None
        }
    }
}

/// Inclusive rectangle of interior cells that a circuit may occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: Loc,
    pub max: Loc,
}

impl BoundingBox {
    pub fn new(min: Loc, max: Loc) -> Self {
        assert!(min.row <= max.row && min.col <= max.col);
        Self { min, max }
    }

    /// `center` plus a one-cell margin, kept inside the interior.
    pub fn around(center: Loc, size: GridSize) -> Self {
        Self::new(
            Loc::new(center.row.saturating_sub(1).max(1), center.col.saturating_sub(1).max(1)),
            Loc::new((center.row + 1).min(size.height), (center.col + 1).min(size.width)),
        )
    }

    /// Pushes an edge out by one cell when `loc` reaches it, never into the border.
    pub fn grow_to_reach(&mut self, loc: Loc, size: GridSize) {
        if loc.col == self.min.col && loc.col > 1 {
            self.min.col -= 1;
        }
        if loc.row == self.min.row && loc.row > 1 {
            self.min.row -= 1;
        }
        if loc.col == self.max.col && loc.col < size.width {
            self.max.col += 1;
        }
        if loc.row == self.max.row && loc.row < size.height {
            self.max.row += 1;
        }
    }

    pub fn contains(&self, loc: Loc) -> bool {
        self.rows().contains(&loc.row) && self.cols().contains(&loc.col)
    }

    pub fn is_inside(&self, size: GridSize) -> bool {
        size.is_interior(self.min) && size.is_interior(self.max)
    }

    pub fn rows(&self) -> RangeInclusive<u32> {
        self.min.row..=self.max.row
    }

    pub fn cols(&self) -> RangeInclusive<u32> {
        self.min.col..=self.max.col
    }

    pub fn num_cells(&self) -> usize {
        (self.max.row - self.min.row + 1) as usize * (self.max.col - self.min.col + 1) as usize
    }

    /// Row-major.
    pub fn locs(&self) -> impl Iterator<Item = Loc> + use<> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |row| cols.clone().map(move |col| Loc::new(row, col)))
    }
}

#[derive(Clone, Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }

    pub fn next_in_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.random_range(range)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
