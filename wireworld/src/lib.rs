#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Wireworld circuits: a random wire path seeded with two electrons, stepped one
//! generation per tick and drawn incrementally through a [`RenderSink`].

mod cell;
mod config;
mod dirty;
mod error;
mod layout;
mod path;
mod redraw;
mod render;
mod world;

pub use cell::{CellState, NeighborRule};
pub use circuit_grid::{BoundingBox, GridSize, Loc, Random};
pub use config::{
    DEFAULT_REDRAW_BUDGET, MIN_CELL_SIZE, MIN_GRID_CELLS, MIN_GRID_SIZE, MIN_WIRES, StartCell,
    WireConfig,
};
pub use dirty::{DirtyCells, RenderReport};
pub use error::WireError;
pub use layout::{CellLayout, PixelRect, PixelSize};
pub use path::{Heading, PathGenerator, PathSummary, Turn, WalkChoices};
pub use redraw::RedrawSequence;
pub use render::{RenderRejected, RenderSink};
pub use world::{Phase, RedrawProgress, StepOutcome, WireWorld};

/// What a host drives from its timer and window events.
pub trait World {
    fn layout(&self) -> CellLayout;
    fn is_redrawing(&self) -> bool;
    fn step<S: RenderSink>(&mut self, sink: &mut S) -> Result<StepOutcome, WireError>;
    fn request_full_redraw(&mut self);
    fn continue_redraw<S: RenderSink>(&mut self, sink: &mut S)
    -> Result<RedrawProgress, WireError>;
    fn resize(&mut self, window: PixelSize) -> Result<(), WireError>;

    /// One host tick: advance a pending full redraw, otherwise step the circuit.
    fn tick<S: RenderSink>(&mut self, sink: &mut S) -> Result<(), WireError> {
        if self.is_redrawing() {
            self.continue_redraw(sink).map(|_| ())
        } else {
            self.step(sink).map(|_| ())
        }
    }
}
