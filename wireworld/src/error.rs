use circuit_grid::AllocationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    /// Grid or dirty-list storage could not be allocated. The host should skip the
    /// frame; the engine keeps whatever state it had.
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("unsupported neighbor count {0}, expected 4 or 8")]
    UnsupportedNeighbors(u32),
}
