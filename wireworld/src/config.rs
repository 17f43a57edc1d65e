use crate::cell::NeighborRule;
use circuit_grid::{GridSize, Loc, Random};

/// Smallest cell edge in pixels.
pub const MIN_CELL_SIZE: u32 = 3;
/// Cells wanted along the short window axis when the cell size is picked for us.
pub const MIN_GRID_SIZE: u32 = 24;
/// Fewest interior cells on either axis.
pub const MIN_GRID_CELLS: u32 = 2;
/// Shortest circuit.
pub const MIN_WIRES: u32 = 32;
pub const DEFAULT_REDRAW_BUDGET: usize = 2000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartCell {
    #[default]
    Center,
    Random,
    At(Loc),
}

impl StartCell {
    pub fn resolve(self, size: GridSize, rand: &mut Random) -> Loc {
        match self {
            StartCell::Center => size.center(),
            StartCell::Random => Loc::new(
                rand.next_in_range(1..=size.height),
                rand.next_in_range(1..=size.width),
            ),
            StartCell::At(loc) => loc,
        }
    }
}

/// Engine settings. Out-of-range values are clamped when used, never rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireConfig {
    /// Circuit length in cells. Negative means "random, up to this many".
    pub count: i32,
    /// Generations a circuit lives before it is replaced.
    pub cycles: u32,
    /// Cell edge in pixels. Negative means "random, up to this many"; zero picks the
    /// largest size that still fits [`MIN_GRID_SIZE`] cells.
    pub size: i32,
    pub neighbors: NeighborRule,
    pub start: StartCell,
    /// Cells visited per full-redraw tick.
    pub redraw_budget: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            cycles: 150,
            size: -8,
            neighbors: NeighborRule::Moore,
            start: StartCell::Center,
            redraw_budget: DEFAULT_REDRAW_BUDGET,
        }
    }
}

impl WireConfig {
    pub fn redraw_budget(&self) -> usize {
        self.redraw_budget.max(1)
    }

    /// Length of the next circuit, between [`MIN_WIRES`] and a quarter of the grid
    /// (unless the grid is too small for even that).
    pub fn circuit_length(&self, size: GridSize, rand: &mut Random) -> u32 {
        let limit = u32::try_from(size.num_cells() / 4).unwrap_or(u32::MAX);
        let count = i64::from(self.count);
        if count < -i64::from(MIN_WIRES) && limit > MIN_WIRES {
            let max = u32::try_from(-count).unwrap_or(u32::MAX).min(limit);
            rand.next_in_range(MIN_WIRES..=max)
        } else if count < i64::from(MIN_WIRES) {
            MIN_WIRES
        } else if count > i64::from(limit) {
            MIN_WIRES.max(limit)
        } else {
            count as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(count: i32, size: GridSize) -> u32 {
        let config = WireConfig {
            count,
            ..WireConfig::default()
        };
        config.circuit_length(size, &mut Random::from_seed(3))
    }

    #[test]
    fn circuit_length_is_clamped() {
        let size = GridSize::new(40, 40);
        assert_eq!(length(100, size), 100);
        assert_eq!(length(5, size), MIN_WIRES);
        assert_eq!(length(0, size), MIN_WIRES);
        assert_eq!(length(-10, size), MIN_WIRES);
        assert_eq!(length(100_000, size), 400);
        assert_eq!(length(1000, GridSize::new(4, 4)), MIN_WIRES);
    }

    #[test]
    fn negative_count_picks_a_random_length() {
        let size = GridSize::new(40, 40);
        let config = WireConfig {
            count: -100,
            ..WireConfig::default()
        };
        let mut rand = Random::from_seed(9);
        for _ in 0..100 {
            let length = config.circuit_length(size, &mut rand);
            assert!((MIN_WIRES..=100).contains(&length), "{length}");
        }
    }

    #[test]
    fn random_start_is_interior() {
        let size = GridSize::new(3, 7);
        let mut rand = Random::from_seed(1);
        for _ in 0..100 {
            assert!(size.is_interior(StartCell::Random.resolve(size, &mut rand)));
        }
        assert_eq!(StartCell::Center.resolve(size, &mut rand), Loc::new(3, 1));
    }

    #[test]
    fn zero_budget_still_makes_progress() {
        let config = WireConfig {
            redraw_budget: 0,
            ..WireConfig::default()
        };
        assert_eq!(config.redraw_budget(), 1);
    }
}
