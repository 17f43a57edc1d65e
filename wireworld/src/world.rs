use crate::World;
use crate::cell::{CellState, NeighborRule};
use crate::config::WireConfig;
use crate::dirty::DirtyCells;
use crate::error::WireError;
use crate::layout::{CellLayout, PixelSize};
use crate::path::PathGenerator;
use crate::redraw::RedrawSequence;
use crate::render::RenderSink;
use circuit_grid::{BoundingBox, CircuitGrid, Random};
use log::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Redrawing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Generation reached by this step; 0 when the step ended by replacing the circuit.
    pub generation: u32,
    pub changed: usize,
    pub dropped: usize,
    pub regenerated: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawProgress {
    pub redrawn: usize,
    pub remaining: usize,
}

/// One Wireworld circuit living in one window.
#[derive(Debug)]
pub struct WireWorld {
    config: WireConfig,
    layout: CellLayout,
    grid: CircuitGrid<CellState>,
    dirty: DirtyCells,
    redraw: Option<RedrawSequence>,
    redraw_batch: DirtyCells,
    generation: u32,
    // `next_cells` holds a generation that is not fully committed to `cells` yet: a
    // freshly laid circuit, or a commit cut short by an allocation failure.
    pending_commit: bool,
    rand: Random,
}

impl WireWorld {
    pub fn new(config: WireConfig, window: PixelSize, mut rand: Random) -> Result<Self, WireError> {
        let layout = CellLayout::new(window, config.size, &mut rand);
        let grid = CircuitGrid::new(layout.grid_size())?;
        let mut result = Self {
            config,
            layout,
            grid,
            dirty: DirtyCells::new(),
            redraw: None,
            redraw_batch: DirtyCells::new(),
            generation: 0,
            pending_commit: false,
            rand,
        };
        result.create_circuit();
        info!(
            "Wire grid {}x{} of {}px cells for a {}x{} window, {} neighbors",
            layout.grid_size().width,
            layout.grid_size().height,
            layout.cell_size(),
            window.width,
            window.height,
            result.config.neighbors.count()
        );
        Ok(result)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.redraw.is_some() {
            Phase::Redrawing
        } else {
            Phase::Idle
        }
    }

    pub fn grid(&self) -> &CircuitGrid<CellState> {
        &self.grid
    }

    pub fn bounds(&self) -> BoundingBox {
        self.grid.bounds()
    }

    pub fn config(&self) -> &WireConfig {
        &self.config
    }

    fn create_circuit(&mut self) {
        self.grid.clear();
        self.dirty.clear();
        let size = self.grid.size();
        let length = self.config.circuit_length(size, &mut self.rand);
        let start = self.config.start.resolve(size, &mut self.rand);
        let mut generator = PathGenerator::new(start, length);
        if self.config.neighbors == NeighborRule::VonNeumann {
            generator = generator.without_row_jitter();
        }
        let path = generator.generate(&mut self.grid, &mut self.rand);
        debug!(
            "New circuit of {} cells from {},{} to {},{}",
            length, path.start.row, path.start.col, path.end.row, path.end.col
        );
        self.generation = 0;
        self.pending_commit = true;
    }

    /// Lays out the window again, which picks a new random cell size when the
    /// configured size is negative, and lays a new circuit.
    fn rebuild(&mut self, window: PixelSize) -> Result<(), WireError> {
        let layout = CellLayout::new(window, self.config.size, &mut self.rand);
        if layout.grid_size() != self.grid.size() {
            self.grid = CircuitGrid::new(layout.grid_size())?;
        }
        self.layout = layout;
        self.create_circuit();
        Ok(())
    }

    fn regenerate<S: RenderSink>(&mut self, sink: &mut S) -> Result<(), WireError> {
        self.rebuild(self.layout.window())?;
        if let Err(err) = sink.clear_all() {
            debug!("Could not clear for the new circuit: {}", err);
        }
        sink.circuit_regenerated();
        Ok(())
    }

    /// Runs one generation with `collect` committing `next_cells` into `cells`. A failed
    /// commit keeps what it recorded and is finished by the next call before the rule
    /// runs again, so `cells` never mixes two generations going into `update`.
    fn step_with<S, F>(&mut self, sink: &mut S, collect: F) -> Result<StepOutcome, WireError>
    where
        S: RenderSink,
        F: FnOnce(&mut DirtyCells, &mut CircuitGrid<CellState>) -> Result<(), WireError>,
    {
        self.abandon_redraw();

        if !self.pending_commit {
            self.grid.update(&self.config.neighbors);
        }
        self.pending_commit = true;
        collect(&mut self.dirty, &mut self.grid)?;
        self.pending_commit = false;

        let changed = self.dirty.len();
        let report = self.dirty.render(sink);

        self.generation += 1;
        let regenerated = self.generation > self.config.cycles;
        if regenerated {
            self.regenerate(sink)?;
        }

        Ok(StepOutcome {
            generation: self.generation,
            changed,
            dropped: report.dropped,
            regenerated,
        })
    }

    fn abandon_redraw(&mut self) {
        if let Some(sequence) = self.redraw.take() {
            debug!(
                "Abandoning full redraw with {} of {} cells left",
                sequence.remaining(),
                sequence.num_cells()
            );
            self.redraw_batch.clear();
        }
    }
}

impl World for WireWorld {
    fn layout(&self) -> CellLayout {
        self.layout
    }

    fn is_redrawing(&self) -> bool {
        self.phase() == Phase::Redrawing
    }

    /// Runs one generation and draws what changed. The first step of a circuit draws
    /// the freshly laid path instead of applying the rule.
    fn step<S: RenderSink>(&mut self, sink: &mut S) -> Result<StepOutcome, WireError> {
        self.step_with(sink, DirtyCells::collect)
    }

    /// Starts repainting the current cells from the top. A repaint already under way
    /// starts over.
    fn request_full_redraw(&mut self) {
        self.redraw = Some(RedrawSequence::new(self.grid.cells.num_cells()));
        self.redraw_batch.clear();
    }

    /// Repaints up to the redraw budget of cells, clearing space cells one by one so a
    /// redraw cut short by `step` leaves nothing erased. Never changes the simulation.
    fn continue_redraw<S: RenderSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<RedrawProgress, WireError> {
        let budget = self.config.redraw_budget();
        let Some(sequence) = self.redraw.as_mut() else {
            return Ok(RedrawProgress {
                redrawn: 0,
                remaining: 0,
            });
        };

        let cells = &self.grid.cells;
        let size = self.grid.size();
        for index in sequence.next_batch(budget) {
            let loc = cells.loc_at(index);
            if size.is_border(loc) {
                continue;
            }
            if let Err(err) = self.redraw_batch.push(loc, cells[loc]) {
                self.redraw_batch.clear();
                return Err(err);
            }
        }
        self.redraw_batch.render(sink);

        let progress = RedrawProgress {
            redrawn: sequence.redrawn(),
            remaining: sequence.remaining(),
        };
        if sequence.is_finished() {
            self.redraw = None;
        }
        Ok(progress)
    }

    /// Rebuilds the grid for a new window and lays a new circuit. On failure the
    /// current grid is kept.
    fn resize(&mut self, window: PixelSize) -> Result<(), WireError> {
        self.abandon_redraw();
        self.rebuild(window)?;
        let layout = self.layout;
        info!(
            "Resized to a {}x{} grid of {}px cells",
            layout.grid_size().width,
            layout.grid_size().height,
            layout.cell_size()
        );
        Ok(())
    }
}
