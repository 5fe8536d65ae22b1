//! Discrete movement directions and heading quantization.
//!
//! The input layer can only hold one of eight compass keys, so continuous
//! headings are quantized into 45° sectors centered on the compass axes.

use serde::{Deserialize, Serialize};

/// Compass ring in counter-clockwise rotation order starting at east (0°).
/// Index k covers the sector centered on k * 45°.
const COMPASS_RING: [Direction; 8] = [
    Direction::East,
    Direction::NorthEast,
    Direction::North,
    Direction::NorthWest,
    Direction::West,
    Direction::SouthWest,
    Direction::South,
    Direction::SouthEast,
];

/// A discrete movement direction the actuator can hold.
///
/// `Idle` means "no key held"; it is never produced by quantization, only
/// committed while the controller is arrived or stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Idle,
}

impl Direction {
    /// Quantize a heading (degrees, 0° = east, CCW positive) into a compass
    /// direction.
    ///
    /// Sectors are `[-22.5°, 22.5°)` for east, rotating by 45° per
    /// direction: inclusive on the clockwise edge, exclusive on the
    /// counter-clockwise edge, so no angle maps to two directions and
    /// `θ` and `θ + 360°` always agree.
    pub fn from_degrees(heading: f64) -> Self {
        let sector = ((heading + 22.5).rem_euclid(360.0) / 45.0) as usize;
        COMPASS_RING[sector.min(7)]
    }

    /// Center angle of this direction's sector in degrees, `None` for `Idle`.
    pub fn degrees(&self) -> Option<f64> {
        self.ring_index().map(|i| i as f64 * 45.0)
    }

    /// The two neighboring compass directions, `(clockwise,
    /// counter_clockwise)`. `Idle` has no neighbors.
    pub fn adjacent(&self) -> Option<(Direction, Direction)> {
        let i = self.ring_index()?;
        Some((COMPASS_RING[(i + 7) % 8], COMPASS_RING[(i + 1) % 8]))
    }

    /// Whether this is the no-movement direction.
    pub fn is_idle(&self) -> bool {
        matches!(self, Direction::Idle)
    }

    fn ring_index(&self) -> Option<usize> {
        COMPASS_RING.iter().position(|d| d == self)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
            Direction::Idle => "idle",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_centers() {
        assert_eq!(Direction::from_degrees(0.0), Direction::East);
        assert_eq!(Direction::from_degrees(45.0), Direction::NorthEast);
        assert_eq!(Direction::from_degrees(90.0), Direction::North);
        assert_eq!(Direction::from_degrees(135.0), Direction::NorthWest);
        assert_eq!(Direction::from_degrees(180.0), Direction::West);
        assert_eq!(Direction::from_degrees(225.0), Direction::SouthWest);
        assert_eq!(Direction::from_degrees(270.0), Direction::South);
        assert_eq!(Direction::from_degrees(315.0), Direction::SouthEast);
    }

    #[test]
    fn test_sector_boundaries_exclusive_on_ccw_edge() {
        // 22.5° belongs to NE, not E; -22.5° (337.5°) belongs to E.
        assert_eq!(Direction::from_degrees(22.5), Direction::NorthEast);
        assert_eq!(Direction::from_degrees(22.4999), Direction::East);
        assert_eq!(Direction::from_degrees(-22.5), Direction::East);
        assert_eq!(Direction::from_degrees(337.5), Direction::East);
    }

    #[test]
    fn test_wraparound_equivalence() {
        for deg in [0.0, 10.0, 22.5, 44.9, 180.0, 200.0, 359.9, -45.0] {
            assert_eq!(
                Direction::from_degrees(deg),
                Direction::from_degrees(deg + 360.0),
                "θ and θ+360° disagree at {deg}"
            );
            assert_eq!(
                Direction::from_degrees(deg),
                Direction::from_degrees(deg - 360.0),
                "θ and θ-360° disagree at {deg}"
            );
        }
    }

    #[test]
    fn test_adjacent() {
        assert_eq!(
            Direction::East.adjacent(),
            Some((Direction::SouthEast, Direction::NorthEast))
        );
        assert_eq!(
            Direction::North.adjacent(),
            Some((Direction::NorthEast, Direction::NorthWest))
        );
        assert_eq!(Direction::Idle.adjacent(), None);
    }
}
