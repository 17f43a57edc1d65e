use crate::cell::CellState;
use circuit_grid::{BoundingBox, CircuitGrid, GridSize, Loc, Random};

/// Cumulative percentages for each turn, checked in order.
const TURN_ODDS: [(u32, Turn); 4] = [
    (75, Turn::Straight),
    (85, Turn::Clockwise),
    (90, Turn::CounterClockwise),
    (100, Turn::Reverse),
];

/// Chance that a horizontal step also shifts one row up or down.
const ROW_JITTER_ODDS: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    pub fn turned(self, turn: Turn) -> Self {
        let quarters = match turn {
            Turn::Straight => 0,
            Turn::Clockwise => 1,
            Turn::Reverse => 2,
            Turn::CounterClockwise => 3,
        };
        Self::ALL[(self as usize + quarters) % Self::ALL.len()]
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::Right | Heading::Left)
    }

    /// The interior cell one step away, or `None` if that step would enter the border.
    fn next_loc(self, from: Loc, row_jitter: i64, size: GridSize) -> Option<Loc> {
        let (row_delta, col_delta) = match self {
            Heading::Up => (-1, 0),
            Heading::Right => (row_jitter, 1),
            Heading::Down => (1, 0),
            Heading::Left => (row_jitter, -1),
        };
        let row = u32::try_from(from.row as i64 + row_delta).ok()?;
        let col = u32::try_from(from.col as i64 + col_delta).ok()?;
        let next = Loc::new(row, col);
        size.is_interior(next).then_some(next)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Clockwise,
    CounterClockwise,
    Reverse,
}

/// The random decisions a walk makes.
pub trait WalkChoices {
    fn initial_heading(&mut self) -> Heading;
    fn turn(&mut self) -> Turn;
    /// -1, 0 or 1.
    fn row_jitter(&mut self) -> i64;
}

impl WalkChoices for Random {
    fn initial_heading(&mut self) -> Heading {
        Heading::ALL[self.next_in_range(0..Heading::ALL.len())]
    }

    fn turn(&mut self) -> Turn {
        let roll: u32 = self.next_in_range(0..100);
        TURN_ODDS
            .iter()
            .find(|(limit, _)| roll < *limit)
            .map_or(Turn::Reverse, |(_, turn)| *turn)
    }

    fn row_jitter(&mut self) -> i64 {
        if !self.next_bool(ROW_JITTER_ODDS) {
            0
        } else if self.next_bool(0.5) {
            -1
        } else {
            1
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathSummary {
    pub start: Loc,
    pub end: Loc,
    pub bounds: BoundingBox,
}

/// Lays a wire by a biased random walk, marking both ends as electron heads.
#[derive(Clone, Copy, Debug)]
pub struct PathGenerator {
    start: Loc,
    length: u32,
    row_jitter: bool,
}

impl PathGenerator {
    pub fn new(start: Loc, length: u32) -> Self {
        Self {
            start,
            length: length.max(1),
            row_jitter: true,
        }
    }

    /// Keeps every step orthogonal, which von Neumann circuits need to stay connected.
    pub fn without_row_jitter(mut self) -> Self {
        self.row_jitter = false;
        self
    }

    /// Writes the path into `grid.next_cells` and sets the grid bounds to the path plus a
    /// one-cell margin. Always takes exactly `length - 1` decisions.
    pub fn generate<W>(&self, grid: &mut CircuitGrid<CellState>, choices: &mut W) -> PathSummary
    where
        W: WalkChoices,
    {
        let size = grid.size();
        let start = Self::clamp_to_interior(self.start, size);
        let cells = &mut grid.next_cells;

        let mut loc = start;
        let mut bounds = BoundingBox::around(loc, size);
        let mut heading = choices.initial_heading();
        cells[loc] = CellState::Head;

        for _ in 1..self.length {
            heading = heading.turned(choices.turn());
            let row_jitter = if self.row_jitter && heading.is_horizontal() {
                choices.row_jitter()
            } else {
                0
            };
            match heading.next_loc(loc, row_jitter, size) {
                Some(next) => {
                    loc = next;
                    bounds.grow_to_reach(loc, size);
                    if cells[loc] == CellState::Space {
                        cells[loc] = CellState::Wire;
                    }
                }
                None => heading = heading.turned(Turn::Reverse),
            }
        }
        cells[loc] = CellState::Head;

        grid.set_bounds(bounds);
        PathSummary {
            start,
            end: loc,
            bounds,
        }
    }

    fn clamp_to_interior(loc: Loc, size: GridSize) -> Loc {
        Loc::new(loc.row.clamp(1, size.height), loc.col.clamp(1, size.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        heading: Heading,
        turns: Vec<Turn>,
    }

    impl WalkChoices for Scripted {
        fn initial_heading(&mut self) -> Heading {
            self.heading
        }

        fn turn(&mut self) -> Turn {
            if self.turns.is_empty() {
                Turn::Straight
            } else {
                self.turns.remove(0)
            }
        }

        fn row_jitter(&mut self) -> i64 {
            0
        }
    }

    fn straight(heading: Heading) -> Scripted {
        Scripted {
            heading,
            turns: vec![],
        }
    }

    fn grid(width: u32, height: u32) -> CircuitGrid<CellState> {
        CircuitGrid::new(GridSize::new(width, height)).unwrap()
    }

    #[test]
    fn straight_path_has_heads_at_both_ends() {
        let mut grid = grid(10, 10);
        let summary =
            PathGenerator::new(Loc::new(5, 5), 5).generate(&mut grid, &mut straight(Heading::Right));

        assert_eq!(summary.start, Loc::new(5, 5));
        assert_eq!(summary.end, Loc::new(5, 9));
        assert_eq!(grid.next_cells[Loc::new(5, 5)], CellState::Head);
        for col in 6..=8 {
            assert_eq!(grid.next_cells[Loc::new(5, col)], CellState::Wire);
        }
        assert_eq!(grid.next_cells[Loc::new(5, 9)], CellState::Head);
        // Each step onto the right edge pushes it out one more, so the box covers the
        // whole path plus the margin, not just the start cell's 3x3.
        assert_eq!(
            summary.bounds,
            BoundingBox::new(Loc::new(4, 4), Loc::new(6, 10))
        );
        assert_eq!(grid.bounds(), summary.bounds);
    }

    #[test]
    fn single_cell_path_keeps_the_margin() {
        let mut grid = grid(10, 10);
        let summary =
            PathGenerator::new(Loc::new(5, 5), 1).generate(&mut grid, &mut straight(Heading::Up));

        assert_eq!(summary.start, summary.end);
        assert_eq!(
            summary.bounds,
            BoundingBox::new(Loc::new(4, 4), Loc::new(6, 6))
        );
    }

    #[test]
    fn walk_reverses_at_the_border() {
        let mut grid = grid(4, 4);
        let summary =
            PathGenerator::new(Loc::new(2, 3), 5).generate(&mut grid, &mut straight(Heading::Right));

        // (2,3) -> (2,4), blocked, then back over (2,3) to (2,2).
        assert_eq!(summary.end, Loc::new(2, 2));
        assert_eq!(grid.next_cells[Loc::new(2, 4)], CellState::Wire);
        assert_eq!(grid.next_cells[Loc::new(2, 3)], CellState::Head);
        assert_eq!(grid.next_cells[Loc::new(2, 2)], CellState::Head);
        assert!(summary.bounds.is_inside(grid.size()));
    }

    #[test]
    fn turns_follow_the_heading() {
        assert_eq!(Heading::Up.turned(Turn::Clockwise), Heading::Right);
        assert_eq!(Heading::Left.turned(Turn::Clockwise), Heading::Up);
        assert_eq!(Heading::Up.turned(Turn::CounterClockwise), Heading::Left);
        assert_eq!(Heading::Down.turned(Turn::Reverse), Heading::Up);
        assert_eq!(Heading::Right.turned(Turn::Straight), Heading::Right);
    }

    #[test]
    fn scripted_turns_trace_a_corner() {
        let mut grid = grid(10, 10);
        let mut choices = Scripted {
            heading: Heading::Right,
            turns: vec![Turn::Straight, Turn::Clockwise, Turn::Straight],
        };
        let summary = PathGenerator::new(Loc::new(5, 5), 4).generate(&mut grid, &mut choices);

        assert_eq!(grid.next_cells[Loc::new(5, 6)], CellState::Wire);
        assert_eq!(grid.next_cells[Loc::new(6, 6)], CellState::Wire);
        assert_eq!(summary.end, Loc::new(7, 6));
        assert_eq!(grid.next_cells[Loc::new(7, 6)], CellState::Head);
    }

    #[test]
    fn random_paths_stay_inside_the_border() {
        for seed in 0..40 {
            let mut rand = Random::from_seed(seed);
            let width = rand.next_in_range(2..30);
            let height = rand.next_in_range(2..30);
            let length = rand.next_in_range(1..2000);
            let mut grid = grid(width, height);
            let start = grid.size().center();

            let summary = PathGenerator::new(start, length).generate(&mut grid, &mut rand);

            let size = grid.size();
            let bounds = summary.bounds;
            assert!(1 <= bounds.min.col && bounds.min.col <= bounds.max.col);
            assert!(bounds.max.col <= size.width);
            assert!(1 <= bounds.min.row && bounds.min.row <= bounds.max.row);
            assert!(bounds.max.row <= size.height);
            for index in 0..grid.next_cells.num_cells() {
                let loc = grid.next_cells.loc_at(index);
                let state = grid.next_cells[loc];
                if size.is_border(loc) {
                    assert_eq!(state, CellState::Space, "seed {seed} {loc:?}");
                } else if state != CellState::Space {
                    assert!(bounds.contains(loc), "seed {seed} {loc:?} outside {bounds:?}");
                }
            }
            assert_eq!(grid.next_cells[summary.start], CellState::Head);
            assert_eq!(grid.next_cells[summary.end], CellState::Head);
        }
    }

    #[test]
    fn turn_odds_favor_going_straight() {
        let mut rand = Random::from_seed(11);
        let straight = (0..10_000)
            .filter(|_| rand.turn() == Turn::Straight)
            .count();
        assert!((7_000..8_000).contains(&straight), "{straight}");
    }
}
