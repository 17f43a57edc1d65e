use std::ops::Range;

/// A restartable walk over every cell index of a grid, pulled a budget at a time so
/// a full repaint never holds up one tick for long. Dropping it cancels the repaint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedrawSequence {
    indexes: Range<usize>,
    num_cells: usize,
}

impl RedrawSequence {
    pub fn new(num_cells: usize) -> Self {
        Self {
            indexes: 0..num_cells,
            num_cells,
        }
    }

    /// Cells handed out so far.
    pub fn redrawn(&self) -> usize {
        self.indexes.start
    }

    pub fn remaining(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_finished(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// The next at most `budget` indexes.
    pub fn next_batch(&mut self, budget: usize) -> Range<usize> {
        let start = self.indexes.start;
        let end = start + budget.min(self.remaining());
        self.indexes.start = end;
        start..end
    }
}

impl Iterator for RedrawSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.indexes.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indexes.size_hint()
    }
}

impl ExactSizeIterator for RedrawSequence {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_resume_where_they_stopped() {
        for (budget, num_cells) in [(2000, 144), (2000, 2000), (2000, 4001), (7, 50), (1, 3)] {
            let mut sequence = RedrawSequence::new(num_cells);
            let mut covered = 0;
            for ticks in 1.. {
                let batch = sequence.next_batch(budget);
                assert_eq!(batch.start, covered);
                covered = batch.end;
                assert_eq!(sequence.redrawn(), (ticks * budget).min(num_cells));
                assert_eq!(!sequence.is_finished(), ticks * budget < num_cells);
                if sequence.is_finished() {
                    break;
                }
            }
            assert_eq!(covered, num_cells);
        }
    }

    #[test]
    fn finished_sequence_yields_nothing() {
        let mut sequence = RedrawSequence::new(3);
        assert_eq!(sequence.next_batch(10), 0..3);
        assert_eq!(sequence.next_batch(10), 3..3);
        assert_eq!(sequence.next(), None);
    }

    #[test]
    fn iterates_lazily() {
        let mut sequence = RedrawSequence::new(5);
        let first: Vec<usize> = sequence.by_ref().take(2).collect();
        assert_eq!(first, vec![0, 1]);
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.redrawn(), 2);
    }
}
