//! Named waypoint records and the read-only waypoint store.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Coordinate;

/// Axis-aligned arrival box around a waypoint.
///
/// Some destinations (starports, cantina interiors) are easier to express as
/// a box than a radius; landing anywhere inside counts as arrived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub x: f64,
    pub y: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl SafeZone {
    pub fn new(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            x,
            y,
            half_width,
            half_height,
        }
    }

    /// Whether a position falls inside the box (edges inclusive).
    pub fn contains(&self, position: &Coordinate) -> bool {
        (position.x - self.x).abs() <= self.half_width
            && (position.y - self.y).abs() <= self.half_height
    }
}

/// A named navigation target.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Waypoint {
    /// Unique key within a store, non-empty
    pub name: String,
    /// Target position (zone/planet metadata included)
    pub coordinate: Coordinate,
    /// Per-waypoint arrival radius override, must be > 0 when present
    pub arrival_radius: Option<f64>,
    /// Optional arrival box, checked in addition to the radius
    pub safe_zone: Option<SafeZone>,
    /// Free-form description for UIs
    pub description: Option<String>,
}

/// Conjunctive filter for [`WaypointStore::list`]; absent fields match
/// everything.
#[derive(Clone, Debug, Default)]
pub struct WaypointFilter {
    pub planet: Option<String>,
    pub zone: Option<String>,
}

impl WaypointFilter {
    fn matches(&self, waypoint: &Waypoint) -> bool {
        let planet_ok = match &self.planet {
            Some(p) => waypoint.coordinate.planet.as_deref() == Some(p.as_str()),
            None => true,
        };
        let zone_ok = match &self.zone {
            Some(z) => waypoint.coordinate.zone.as_deref() == Some(z.as_str()),
            None => true,
        };
        planet_ok && zone_ok
    }
}

/// On-disk waypoint record. All fields optional so that one malformed
/// record is skipped instead of failing the whole file; unknown fields are
/// ignored for forward compatibility.
#[derive(Debug, Deserialize)]
struct RawWaypoint {
    #[serde(default)]
    name: String,
    x: Option<f64>,
    y: Option<f64>,
    planet: Option<String>,
    zone: Option<String>,
    description: Option<String>,
    arrival_radius: Option<f64>,
    safe_zone: Option<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct WaypointFile {
    #[serde(default)]
    waypoints: Vec<RawWaypoint>,
}

/// Read-only collection of named waypoints.
///
/// Loaded once at construction; the navigation loop only ever reads it.
#[derive(Debug)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
    by_name: HashMap<String, usize>,
}

impl WaypointStore {
    /// Load a store from a TOML file of `[[waypoints]]` records.
    ///
    /// A missing or unparseable file falls back to the built-in set, so the
    /// caller always gets a usable store; the fallback is logged as a
    /// warning. Individual records failing validation are skipped and
    /// counted, not fatal.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("waypoint file {:?} unreadable ({}), using built-in set", path, e);
                return Self::builtin();
            }
        };

        let file: WaypointFile = match toml::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("waypoint file {:?} unparseable ({}), using built-in set", path, e);
                return Self::builtin();
            }
        };

        let store = Self::from_records(file.waypoints);
        tracing::info!("loaded {} waypoints from {:?}", store.len(), path);
        store
    }

    /// Build a store from parsed records, skipping invalid ones.
    fn from_records(records: Vec<RawWaypoint>) -> Self {
        let mut store = Self {
            waypoints: Vec::with_capacity(records.len()),
            by_name: HashMap::new(),
        };
        let mut skipped = 0usize;

        for record in records {
            match store.validate(record) {
                Ok(waypoint) => store.insert(waypoint),
                Err(reason) => {
                    skipped += 1;
                    tracing::warn!("skipping waypoint record: {}", reason);
                }
            }
        }

        if skipped > 0 {
            tracing::warn!("{} waypoint records skipped during load", skipped);
        }
        store
    }

    fn validate(&self, record: RawWaypoint) -> std::result::Result<Waypoint, String> {
        if record.name.is_empty() {
            return Err("missing or empty name".into());
        }
        if self.by_name.contains_key(&record.name) {
            return Err(format!("duplicate name {:?}", record.name));
        }
        let (x, y) = match (record.x, record.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => (x, y),
            _ => return Err(format!("{:?}: missing or non-finite x/y", record.name)),
        };
        if let Some(radius) = record.arrival_radius
            && !(radius > 0.0)
        {
            return Err(format!("{:?}: arrival_radius must be > 0", record.name));
        }

        let mut coordinate = Coordinate::new(x, y).labeled(record.name.clone());
        coordinate.planet = record.planet;
        coordinate.zone = record.zone;

        Ok(Waypoint {
            name: record.name,
            coordinate,
            arrival_radius: record.arrival_radius,
            safe_zone: record
                .safe_zone
                .map(|[zx, zy, half_w, half_h]| SafeZone::new(zx, zy, half_w, half_h)),
            description: record.description,
        })
    }

    fn insert(&mut self, waypoint: Waypoint) {
        self.by_name
            .insert(waypoint.name.clone(), self.waypoints.len());
        self.waypoints.push(waypoint);
    }

    /// The built-in default set, used when no waypoint file is available.
    pub fn builtin() -> Self {
        let records = vec![
            raw("mos_eisley", 3528.0, -4804.0, "tatooine", Some(12.0), None),
            raw("bestine_capitol", -1290.0, -3590.0, "tatooine", None, None),
            raw(
                "coronet_starport",
                -66.0, -4465.0,
                "corellia",
                None,
                Some([-66.0, -4465.0, 40.0, 25.0]),
            ),
            raw("theed_palace", -4856.0, 4162.0, "naboo", Some(15.0), None),
            raw("anchorhead", 43.0, -5344.0, "tatooine", None, None),
        ];
        Self::from_records(records)
    }

    /// Look up a waypoint by name.
    pub fn get(&self, name: &str) -> Option<&Waypoint> {
        self.by_name.get(name).map(|&i| &self.waypoints[i])
    }

    /// Waypoints matching the filter, in load order.
    pub fn list(&self, filter: &WaypointFilter) -> Vec<&Waypoint> {
        self.waypoints
            .iter()
            .filter(|w| filter.matches(w))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Record constructor for the built-in set.
fn raw(
    name: &str,
    x: f64,
    y: f64,
    planet: &str,
    arrival_radius: Option<f64>,
    safe_zone: Option<[f64; 4]>,
) -> RawWaypoint {
    RawWaypoint {
        name: name.to_string(),
        x: Some(x),
        y: Some(y),
        planet: Some(planet.to_string()),
        zone: None,
        description: None,
        arrival_radius,
        safe_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_is_nonempty() {
        let store = WaypointStore::builtin();
        assert!(!store.is_empty());
        assert!(store.get("mos_eisley").is_some());
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let store = WaypointStore::load(Path::new("/nonexistent/waypoints.toml"));
        assert_eq!(store.len(), WaypointStore::builtin().len());
    }

    #[test]
    fn test_load_and_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[waypoints]]
name = "cantina"
x = 3521.0
y = -4790.0
planet = "tatooine"
zone = "mos_eisley"
arrival_radius = 6.0

[[waypoints]]
name = "hangar"
x = -120.0
y = 88.0
planet = "corellia"
safe_zone = [-120.0, 88.0, 30.0, 20.0]
future_field = "ignored"
"#
        )
        .unwrap();

        let store = WaypointStore::load(file.path());
        assert_eq!(store.len(), 2);

        let cantina = store.get("cantina").unwrap();
        assert_eq!(cantina.arrival_radius, Some(6.0));
        assert_eq!(cantina.coordinate.planet.as_deref(), Some("tatooine"));

        let hangar = store.get("hangar").unwrap();
        let zone = hangar.safe_zone.unwrap();
        assert!(zone.contains(&Coordinate::new(-100.0, 75.0)));
        assert!(!zone.contains(&Coordinate::new(-100.0, 120.0)));
    }

    #[test]
    fn test_invalid_records_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[waypoints]]
name = "good"
x = 1.0
y = 2.0

[[waypoints]]
name = ""
x = 3.0
y = 4.0

[[waypoints]]
name = "no_coords"

[[waypoints]]
name = "good"
x = 5.0
y = 6.0

[[waypoints]]
name = "bad_radius"
x = 7.0
y = 8.0
arrival_radius = 0.0
"#
        )
        .unwrap();

        let store = WaypointStore::load(file.path());
        assert_eq!(store.len(), 1);
        // First occurrence wins for duplicate names.
        assert_eq!(store.get("good").unwrap().coordinate.x, 1.0);
    }

    #[test]
    fn test_list_filters_are_conjunctive() {
        let store = WaypointStore::builtin();

        let all = store.list(&WaypointFilter::default());
        assert_eq!(all.len(), store.len());

        let tatooine = store.list(&WaypointFilter {
            planet: Some("tatooine".into()),
            zone: None,
        });
        assert!(tatooine.len() >= 2);
        assert!(
            tatooine
                .iter()
                .all(|w| w.coordinate.planet.as_deref() == Some("tatooine"))
        );

        let nowhere = store.list(&WaypointFilter {
            planet: Some("tatooine".into()),
            zone: Some("not_a_zone".into()),
        });
        assert!(nowhere.is_empty());
    }
}
