//! Path smoothing: damping of directional commands against sample noise.
//!
//! Position samples come from minimap OCR and jitter by a few units. Raw
//! quantization of each sample's bearing would flip the held key on every
//! outlier, so a direction change is only committed once it has been
//! proposed by two consecutive samples.

use std::collections::VecDeque;

use super::coord::Coordinate;
use super::direction::Direction;

/// Commit-on-persistence direction filter with a bounded position history.
///
/// The history ring is diagnostic only; arrival math never reads it.
#[derive(Debug)]
pub struct DirectionFilter {
    committed: Option<Direction>,
    pending: Option<Direction>,
    history: VecDeque<Coordinate>,
    capacity: usize,
}

impl DirectionFilter {
    /// Create a filter keeping the last `capacity` positions.
    pub fn new(capacity: usize) -> Self {
        Self {
            committed: None,
            pending: None,
            history: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Feed one position sample and its proposed (quantized) direction;
    /// returns the direction to actually command.
    ///
    /// The very first sample commits immediately. After that, a proposal
    /// differing from the committed direction must repeat on the next
    /// sample before it replaces it, so a single outlier sample keeps the
    /// previous direction.
    pub fn observe(&mut self, position: Coordinate, proposed: Direction) -> Direction {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(position);

        match self.committed {
            None => {
                self.committed = Some(proposed);
                proposed
            }
            Some(current) if proposed == current => {
                self.pending = None;
                current
            }
            Some(current) => {
                if self.pending == Some(proposed) {
                    // Second consecutive sample agreeing: commit the change.
                    self.committed = Some(proposed);
                    self.pending = None;
                    proposed
                } else {
                    self.pending = Some(proposed);
                    current
                }
            }
        }
    }

    /// The currently committed direction, if any sample has been seen.
    pub fn committed(&self) -> Option<Direction> {
        self.committed
    }

    /// Recent position samples, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Coordinate> {
        self.history.iter()
    }

    /// Forget all samples and the committed direction (used on retry).
    pub fn reset(&mut self) {
        self.committed = None;
        self.pending = None;
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn test_first_sample_commits_immediately() {
        let mut filter = DirectionFilter::new(4);
        assert_eq!(filter.observe(pos(0.0, 0.0), Direction::NorthEast), Direction::NorthEast);
        assert_eq!(filter.committed(), Some(Direction::NorthEast));
    }

    #[test]
    fn test_single_outlier_does_not_flip() {
        let mut filter = DirectionFilter::new(4);
        filter.observe(pos(0.0, 0.0), Direction::East);
        filter.observe(pos(1.0, 0.0), Direction::East);
        // One noisy sample proposes North...
        assert_eq!(filter.observe(pos(1.5, 0.5), Direction::North), Direction::East);
        // ...and the next sample reverts to the trend: East survives.
        assert_eq!(filter.observe(pos(2.0, 0.0), Direction::East), Direction::East);
        assert_eq!(filter.committed(), Some(Direction::East));
    }

    #[test]
    fn test_persistent_change_commits_on_second_sample() {
        let mut filter = DirectionFilter::new(4);
        filter.observe(pos(0.0, 0.0), Direction::East);
        assert_eq!(filter.observe(pos(1.0, 0.0), Direction::North), Direction::East);
        assert_eq!(filter.observe(pos(1.0, 1.0), Direction::North), Direction::North);
        assert_eq!(filter.committed(), Some(Direction::North));
    }

    #[test]
    fn test_alternating_proposals_never_commit() {
        let mut filter = DirectionFilter::new(4);
        filter.observe(pos(0.0, 0.0), Direction::East);
        for i in 0..6 {
            let proposed = if i % 2 == 0 { Direction::North } else { Direction::South };
            assert_eq!(filter.observe(pos(i as f64, 0.0), proposed), Direction::East);
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut filter = DirectionFilter::new(3);
        for i in 0..10 {
            filter.observe(pos(i as f64, 0.0), Direction::East);
        }
        let history: Vec<_> = filter.history().collect();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].x, 7.0);
        assert_eq!(history[2].x, 9.0);
    }

    #[test]
    fn test_reset_forgets_commitment() {
        let mut filter = DirectionFilter::new(4);
        filter.observe(pos(0.0, 0.0), Direction::East);
        filter.reset();
        assert_eq!(filter.committed(), None);
        assert_eq!(filter.observe(pos(0.0, 0.0), Direction::South), Direction::South);
    }
}
