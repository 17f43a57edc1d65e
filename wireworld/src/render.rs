use crate::cell::CellState;
use circuit_grid::Loc;
use thiserror::Error;

/// The drawing surface could not take a request. The engine drops that batch for the
/// current tick; the simulation state is already committed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RenderRejected {
    #[error("render surface is not ready")]
    NotReady,

    #[error("cell {}, {} lies outside the render surface", .0.row, .0.col)]
    OutsideSurface(Loc),
}

/// Where cells get drawn. Locations are in bordered grid coordinates, so interior
/// cells start at row 1, col 1.
pub trait RenderSink {
    /// Draws every cell in `cells` with the look of `state`. Never called with
    /// [`CellState::Space`].
    fn fill_cells(&mut self, state: CellState, cells: &[Loc]) -> Result<(), RenderRejected>;

    fn clear_cell(&mut self, loc: Loc) -> Result<(), RenderRejected>;

    fn clear_all(&mut self) -> Result<(), RenderRejected>;

    /// A new circuit replaced the old one.
    fn circuit_regenerated(&mut self) {}
}
