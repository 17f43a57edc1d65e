use crate::error::WireError;
use circuit_grid::{GridCell, Neighborhood};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellState {
    #[default]
    Space,
    Wire,
    Head,
    Tail,
}

impl CellState {
    pub const ALL: [CellState; 4] = [
        CellState::Space,
        CellState::Wire,
        CellState::Head,
        CellState::Tail,
    ];

    /// States drawn with a fill; `Space` is drawn by clearing.
    pub const FILLED: [CellState; 3] = [CellState::Wire, CellState::Head, CellState::Tail];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The classic rule. A wire becomes an electron head when 1 or 2 of its
    /// neighbors are heads.
    pub fn next(self, head_neighbors: usize) -> Self {
        match self {
            CellState::Space => CellState::Space,
            CellState::Head => CellState::Tail,
            CellState::Tail => CellState::Wire,
            CellState::Wire if (1..=2).contains(&head_neighbors) => CellState::Head,
            CellState::Wire => CellState::Wire,
        }
    }
}

impl GridCell for CellState {
    type Rule = NeighborRule;

    fn update(
        &self,
        neighborhood: &Neighborhood<CellState>,
        rule: &NeighborRule,
        next_cell: &mut CellState,
    ) {
        *next_cell = match self {
            CellState::Wire => self.next(rule.count_heads(neighborhood)),
            _ => self.next(0),
        };
    }
}

/// Which neighbors count toward turning a wire into a head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NeighborRule {
    #[default]
    Moore,
    VonNeumann,
}

impl NeighborRule {
    pub fn count(self) -> u32 {
        match self {
            NeighborRule::Moore => 8,
            NeighborRule::VonNeumann => 4,
        }
    }

    fn count_heads(self, neighborhood: &Neighborhood<CellState>) -> usize {
        let mut result = 0;
        let mut add = |neighbor: &CellState| {
            if *neighbor == CellState::Head {
                result += 1;
            }
        };
        match self {
            NeighborRule::Moore => neighborhood.for_neighbor_cells(&mut add),
            NeighborRule::VonNeumann => neighborhood.for_orthogonal_cells(&mut add),
        }
        result
    }
}

impl TryFrom<u32> for NeighborRule {
    type Error = WireError;

    fn try_from(neighbors: u32) -> Result<Self, Self::Error> {
        match neighbors {
            8 => Ok(NeighborRule::Moore),
            4 => Ok(NeighborRule::VonNeumann),
            other => Err(WireError::UnsupportedNeighbors(other)),
        }
    }
}
