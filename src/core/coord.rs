//! Coordinate value type and 2D distance/bearing math.

use serde::{Deserialize, Serialize};

/// A position in game-world coordinates.
///
/// `zone` and `planet` are metadata carried for logging and waypoint
/// filtering; they do not participate in distance math. Two coordinates on
/// different planets with nearby raw x/y therefore compare as close. This
/// mirrors the in-game minimap readout, which is always planet-local.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// X coordinate in world units (east positive)
    pub x: f64,
    /// Y coordinate in world units (north positive)
    pub y: f64,
    /// Zone or region name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Planet name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Free-form label for logs (e.g. the waypoint name this came from)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Coordinate {
    /// Create a coordinate with no zone/planet metadata.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            zone: None,
            planet: None,
            label: None,
        }
    }

    /// Attach a zone name.
    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Attach a planet name.
    pub fn on_planet(mut self, planet: impl Into<String>) -> Self {
        self.planet = Some(planet.into());
        self
    }

    /// Attach a display label.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Unqualified 2D Euclidean distance to another coordinate.
    ///
    /// Zone and planet are ignored: a target on another planet can read as
    /// "near" if the raw x/y happen to line up. Callers that care must
    /// compare the metadata themselves.
    #[inline]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing from this coordinate to another, in degrees `[0, 360)`.
    ///
    /// 0° is east (+x), rotating counter-clockwise: 90° is north (+y).
    #[inline]
    pub fn bearing_to(&self, other: &Coordinate) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dy.atan2(dx).to_degrees().rem_euclid(360.0)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.planet, &self.zone) {
            (Some(planet), Some(zone)) => {
                write!(f, "({:.1}, {:.1}) [{planet}/{zone}]", self.x, self.y)
            }
            (Some(planet), None) => write!(f, "({:.1}, {:.1}) [{planet}]", self.x, self.y),
            _ => write!(f, "({:.1}, {:.1})", self.x, self.y),
        }
    }
}

/// Normalize a degree angle difference to `[-180, 180)`.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_ignores_planet() {
        let a = Coordinate::new(10.0, 10.0).on_planet("tatooine");
        let b = Coordinate::new(10.0, 10.0).on_planet("naboo");
        assert_eq!(a.distance(&b), 0.0);
    }

    #[test]
    fn test_bearing() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((origin.bearing_to(&Coordinate::new(10.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(0.0, -10.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(190.0) - (-170.0)).abs() < 1e-9);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-9);
        assert!((normalize_degrees(0.0)).abs() < 1e-9);
        assert!((normalize_degrees(-180.0) - (-180.0)).abs() < 1e-9);
    }
}
