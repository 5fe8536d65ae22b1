//! YatraNav - movement control core for game-automation clients.
//!
//! Drives a controlled character from its current position to a named or
//! coordinate target by issuing discrete directional holds, using
//! periodically sampled (and sometimes stale or missing) position estimates
//! as the only feedback.
//!
//! ## Architecture
//!
//! - [`WaypointStore`]: named locations loaded from TOML, with a built-in
//!   fallback set
//! - [`PositionProvider`] / [`MovementActuator`]: contracts for the host's
//!   minimap-reading and input-injection subsystems
//! - [`Navigator`]: the closed-loop state machine (sample, quantize,
//!   smooth, command, then evaluate arrival/stuck/timeout each tick)
//! - [`NavHandle`]: watch progress or cancel from another thread
//! - [`EventLog`]: append-only JSONL progression records, best-effort
//!
//! ## Example
//!
//! ```rust,no_run
//! use yatra_nav::{NavConfig, Navigator, WaypointStore};
//! # use yatra_nav::{Coordinate, Direction, ActuatorError};
//! # struct Ocr;
//! # impl yatra_nav::PositionProvider for Ocr {
//! #     fn sample(&mut self) -> Option<Coordinate> { None }
//! # }
//! # struct Keys;
//! # impl yatra_nav::MovementActuator for Keys {
//! #     fn hold(&mut self, _: Direction) -> Result<(), ActuatorError> { Ok(()) }
//! #     fn stop(&mut self) -> Result<(), ActuatorError> { Ok(()) }
//! # }
//!
//! # fn main() -> Result<(), yatra_nav::NavError> {
//! let store = WaypointStore::load(std::path::Path::new("waypoints.toml"));
//! let mut navigator = Navigator::new(store, NavConfig::default(), Ocr, Keys)?;
//!
//! let outcome = navigator.navigate_to("mos_eisley")?;
//! println!("ended {}: {}", outcome.status, outcome.reason);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod navigation;
pub mod shared;
pub mod telemetry;
pub mod waypoint;

pub use config::NavConfig;
pub use core::{Coordinate, Direction, DirectionFilter};
pub use error::{NavError, Result};
pub use io::{ActuatorError, MovementActuator, PositionProvider};
pub use navigation::{NavOutcome, NavStatus, NavTarget, Navigator, StatusView};
pub use shared::NavHandle;
pub use telemetry::{EventLog, ProgressRecord};
pub use waypoint::{SafeZone, Waypoint, WaypointFilter, WaypointStore};
