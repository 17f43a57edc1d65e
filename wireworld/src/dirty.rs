use crate::cell::CellState;
use crate::error::WireError;
use crate::render::RenderSink;
use circuit_grid::{AllocationError, CircuitGrid, Loc};
use log::debug;

/// Changed cells of one generation, bucketed by the state they changed to.
#[derive(Debug, Default)]
pub struct DirtyCells {
    buckets: [Vec<Loc>; 4],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub drawn: usize,
    pub dropped: usize,
}

impl DirtyCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits `next_cells` into `cells` inside the grid bounds, recording every change.
    /// If a record cannot be stored, that cell and the rest stay uncommitted and the
    /// changes recorded so far stay queued, so calling again finishes the commit.
    pub fn collect(&mut self, grid: &mut CircuitGrid<CellState>) -> Result<(), WireError> {
        let buckets = &mut self.buckets;
        grid.commit_next(|loc, state| Self::push_into(buckets, loc, state))?;
        Ok(())
    }

    pub fn push(&mut self, loc: Loc, state: CellState) -> Result<(), WireError> {
        Self::push_into(&mut self.buckets, loc, state)?;
        Ok(())
    }

    fn push_into(
        buckets: &mut [Vec<Loc>; 4],
        loc: Loc,
        state: CellState,
    ) -> Result<(), AllocationError> {
        let bucket = &mut buckets[state.index()];
        bucket
            .try_reserve(1)
            .map_err(|source| AllocationError::new(bucket.len() + 1, source))?;
        bucket.push(loc);
        Ok(())
    }

    pub fn cells(&self, state: CellState) -> &[Loc] {
        &self.buckets[state.index()]
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Keeps the capacity for the next generation.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }

    /// Hands each bucket to `sink` as one request, then empties it. Cells that became
    /// `Space` are cleared one by one. A rejected request only loses its drawing.
    pub fn render<S: RenderSink>(&mut self, sink: &mut S) -> RenderReport {
        let mut report = RenderReport::default();

        for loc in self.buckets[CellState::Space.index()].drain(..) {
            match sink.clear_cell(loc) {
                Ok(()) => report.drawn += 1,
                Err(err) => {
                    debug!("Dropping clear of {},{}: {}", loc.row, loc.col, err);
                    report.dropped += 1;
                }
            }
        }

        for state in CellState::FILLED {
            let bucket = &mut self.buckets[state.index()];
            if bucket.is_empty() {
                continue;
            }
            match sink.fill_cells(state, bucket.as_slice()) {
                Ok(()) => report.drawn += bucket.len(),
                Err(err) => {
                    debug!("Dropping {} {:?} cells this tick: {}", bucket.len(), state, err);
                    report.dropped += bucket.len();
                }
            }
            bucket.clear();
        }

        report
    }
}
