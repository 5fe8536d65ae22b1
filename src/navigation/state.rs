//! Navigation status, per-attempt state, and the externally visible views.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::NavConfig;
use crate::core::{Coordinate, DirectionFilter};
use crate::waypoint::SafeZone;

/// State of a navigation attempt.
///
/// `Idle` is both the initial state and the state after any terminal
/// outcome; the machine is reusable for a new target. There is no paused
/// state; cancellation goes straight to `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavStatus {
    /// No navigation in progress
    Idle,
    /// Actively driving toward the target
    Moving,
    /// Within the arrival radius or safe zone
    Arrived,
    /// Gave up: cancelled, stuck retries exhausted, or actuator fault
    Failed,
    /// Wall-clock ceiling exceeded
    TimedOut,
    /// Position feed lost for too many consecutive samples
    Obstacle,
}

impl NavStatus {
    /// Whether this status ends a navigation call.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NavStatus::Idle | NavStatus::Moving)
    }
}

impl std::fmt::Display for NavStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NavStatus::Idle => "idle",
            NavStatus::Moving => "moving",
            NavStatus::Arrived => "arrived",
            NavStatus::Failed => "failed",
            NavStatus::TimedOut => "timed_out",
            NavStatus::Obstacle => "obstacle",
        };
        f.write_str(s)
    }
}

/// Mutable state owned by one running navigation call.
///
/// Constructed when the call starts, dropped when it returns; nothing here
/// survives across independent calls.
#[derive(Debug)]
pub(crate) struct NavigationState {
    pub status: NavStatus,
    /// Last good sample, `None` before the first read
    pub current_position: Option<Coordinate>,
    /// Set once at call start, never mutated mid-flight
    pub target: Coordinate,
    /// Effective arrival radius for this target
    pub arrival_radius: f64,
    /// Optional arrival box for this target
    pub safe_zone: Option<SafeZone>,
    /// Full retries consumed by stuck recovery
    pub attempts: u32,
    pub start_time: Instant,
    pub last_progress_time: Instant,
    /// Smallest distance-to-target seen since the last retry
    pub best_distance: Option<f64>,
    /// Smoothed heading estimate, degrees `[0, 360)`
    pub heading: f64,
    /// Direction damping filter plus recent-position ring
    pub filter: DirectionFilter,
    /// Consecutive failed position reads
    pub consecutive_misses: u32,
}

impl NavigationState {
    pub fn new(
        target: Coordinate,
        arrival_radius: f64,
        safe_zone: Option<SafeZone>,
        config: &NavConfig,
    ) -> Self {
        let now = Instant::now();
        Self {
            status: NavStatus::Moving,
            current_position: None,
            target,
            arrival_radius,
            safe_zone,
            attempts: 0,
            start_time: now,
            last_progress_time: now,
            best_distance: None,
            heading: 0.0,
            filter: DirectionFilter::new(config.history_len),
            consecutive_misses: 0,
        }
    }

    /// Distance from the last good sample to the target, if any sample has
    /// been seen.
    pub fn distance_remaining(&self) -> Option<f64> {
        self.current_position
            .as_ref()
            .map(|p| p.distance(&self.target))
    }
}

/// Terminal report returned by a navigation call.
#[derive(Clone, Debug, Serialize)]
pub struct NavOutcome {
    /// One of the terminal statuses
    pub status: NavStatus,
    /// Human-readable explanation ("arrived", "cancelled", "stuck_exhausted: ...")
    pub reason: String,
    /// How close the character got, if a position was ever read
    pub distance_remaining: Option<f64>,
    /// Retries consumed
    pub attempts: u32,
    /// Wall-clock duration of the call
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Point-in-time projection of navigation state, safe to read from outside
/// the control loop at any time.
#[derive(Clone, Debug, Serialize)]
pub struct StatusView {
    pub status: NavStatus,
    pub current_position: Option<Coordinate>,
    pub target_position: Option<Coordinate>,
    pub heading_degrees: f64,
    pub attempts: u32,
    pub elapsed_seconds: f64,
}

impl Default for StatusView {
    fn default() -> Self {
        Self {
            status: NavStatus::Idle,
            current_position: None,
            target_position: None,
            heading_degrees: 0.0,
            attempts: 0,
            elapsed_seconds: 0.0,
        }
    }
}

impl StatusView {
    /// Build a view of the running state.
    pub(crate) fn of(state: &NavigationState, status: NavStatus) -> Self {
        Self {
            status,
            current_position: state.current_position.clone(),
            target_position: Some(state.target.clone()),
            heading_degrees: state.heading,
            attempts: state.attempts,
            elapsed_seconds: state.start_time.elapsed().as_secs_f64(),
        }
    }
}
