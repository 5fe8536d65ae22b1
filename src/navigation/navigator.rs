//! The closed-loop navigation state machine.
//!
//! One call to [`Navigator::navigate_to`] runs one cooperative control
//! loop: sample position, compute and quantize the heading, damp it against
//! recent samples, command the actuator, then evaluate arrival, timeout,
//! and stuck conditions. Every terminal path funnels through a single exit
//! that stops the actuator exactly once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::NavConfig;
use crate::core::{Coordinate, Direction, normalize_degrees};
use crate::error::{NavError, Result};
use crate::io::{MovementActuator, PositionProvider};
use crate::navigation::state::{NavOutcome, NavStatus, NavigationState, StatusView};
use crate::shared::{NavHandle, SharedNav};
use crate::telemetry::{EventLog, ProgressRecord, now_ms};
use crate::waypoint::{SafeZone, WaypointStore};

/// Smallest distance reduction that counts as progress, in world units.
/// Filters out sub-unit jitter in the position feed.
const PROGRESS_EPSILON: f64 = 1e-6;

/// Interval between human-readable status log lines.
const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(3);

/// A navigation target: a waypoint name resolved through the store, or raw
/// coordinates taken as-is.
#[derive(Clone, Debug)]
pub enum NavTarget {
    Waypoint(String),
    Point(Coordinate),
}

impl From<&str> for NavTarget {
    fn from(name: &str) -> Self {
        NavTarget::Waypoint(name.to_string())
    }
}

impl From<String> for NavTarget {
    fn from(name: String) -> Self {
        NavTarget::Waypoint(name)
    }
}

impl From<Coordinate> for NavTarget {
    fn from(coordinate: Coordinate) -> Self {
        NavTarget::Point(coordinate)
    }
}

/// Movement controller for one character.
///
/// Owns the waypoint store, the run configuration, and the two external
/// collaborators. The host constructs one instance per controlled
/// character and calls it from a single thread; [`NavHandle`]s may watch
/// and cancel from anywhere.
pub struct Navigator<P, A>
where
    P: PositionProvider,
    A: MovementActuator,
{
    store: WaypointStore,
    config: NavConfig,
    provider: P,
    actuator: A,
    shared: Arc<SharedNav>,
    log: EventLog,
}

impl<P, A> Navigator<P, A>
where
    P: PositionProvider,
    A: MovementActuator,
{
    /// Create a navigator. Fails if the configuration is invalid.
    pub fn new(store: WaypointStore, config: NavConfig, provider: P, actuator: A) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            provider,
            actuator,
            shared: Arc::new(SharedNav::default()),
            log: EventLog::disabled(),
        })
    }

    /// Attach an event log (the default discards records).
    pub fn with_event_log(mut self, log: EventLog) -> Self {
        self.log = log;
        self
    }

    /// Handle for watching or cancelling from another thread.
    pub fn handle(&self) -> NavHandle {
        NavHandle::new(Arc::clone(&self.shared))
    }

    /// Point-in-time status snapshot.
    pub fn status(&self) -> StatusView {
        self.shared.snapshot()
    }

    /// Request cooperative cancellation of the active navigation.
    pub fn cancel(&self) {
        self.shared.request_cancel();
    }

    /// The read-only waypoint store.
    pub fn store(&self) -> &WaypointStore {
        &self.store
    }

    /// Drive the character to a waypoint (by name) or to raw coordinates.
    ///
    /// Blocks until a terminal condition: returns the terminal status and a
    /// human-readable reason. The actuator is always told to stop exactly
    /// once before this returns, on every path including cancellation and
    /// sensor-fault escalation. An unknown waypoint name fails immediately
    /// without starting the loop.
    pub fn navigate_to(&mut self, target: impl Into<NavTarget>) -> Result<NavOutcome> {
        let (coordinate, arrival_radius, safe_zone) = self.resolve(target.into())?;

        // Stale cancel requests belong to earlier calls; each navigation
        // starts with a clear flag (nothing survives across calls).
        self.shared.clear_cancel();

        let mut state = NavigationState::new(coordinate, arrival_radius, safe_zone, &self.config);
        tracing::info!(
            "navigating to {} (arrival radius {:.1})",
            state.target,
            state.arrival_radius
        );
        self.shared.publish(StatusView::of(&state, NavStatus::Moving));
        self.log_record(&state, NavStatus::Moving, Some("navigation started"));

        let outcome = self.run_loop(&mut state);
        state.status = outcome.status;

        // The one stop of this call; best-effort even on error paths.
        if let Err(e) = self.actuator.stop() {
            tracing::error!("final stop command failed: {}", e);
        }

        self.log_record(&state, outcome.status, Some(outcome.reason.as_str()));
        match outcome.status {
            NavStatus::Arrived => tracing::info!(
                "arrived at {} after {:.1}s",
                state.target,
                outcome.elapsed.as_secs_f64()
            ),
            status => tracing::warn!(
                "navigation to {} ended {}: {}",
                state.target,
                status,
                outcome.reason
            ),
        }

        // Terminal state goes back to Idle; the machine is reusable. The
        // last positions stay in the snapshot so callers can see how close
        // the character got.
        state.status = NavStatus::Idle;
        self.shared.publish(StatusView::of(&state, state.status));

        Ok(outcome)
    }

    /// Resolve a target into coordinates, effective radius, and safe zone.
    fn resolve(&self, target: NavTarget) -> Result<(Coordinate, f64, Option<SafeZone>)> {
        match target {
            NavTarget::Waypoint(name) => {
                let waypoint = self
                    .store
                    .get(&name)
                    .ok_or_else(|| NavError::UnknownWaypoint(name.clone()))?;
                Ok((
                    waypoint.coordinate.clone(),
                    waypoint
                        .arrival_radius
                        .unwrap_or(self.config.arrival_radius_default),
                    waypoint.safe_zone,
                ))
            }
            NavTarget::Point(coordinate) => {
                Ok((coordinate, self.config.arrival_radius_default, None))
            }
        }
    }

    /// The control loop proper. Returns the terminal outcome; issuing the
    /// final stop is the caller's job so it happens exactly once.
    fn run_loop(&mut self, state: &mut NavigationState) -> NavOutcome {
        let mut last_status_log = Instant::now();

        loop {
            // Cooperative cancellation, observed at the top of every
            // iteration.
            if self.shared.cancel_requested() {
                return Self::outcome(state, NavStatus::Failed, "cancelled".to_string());
            }

            let position = match self.provider.sample() {
                Some(position) => {
                    state.consecutive_misses = 0;
                    position
                }
                None => {
                    // Sensor miss: no actuator command this iteration. The
                    // previous hold keeps the character moving on its last
                    // committed direction.
                    state.consecutive_misses += 1;
                    tracing::debug!(
                        "position unavailable ({} consecutive misses)",
                        state.consecutive_misses
                    );
                    if state.consecutive_misses >= self.config.max_sample_misses {
                        return Self::outcome(
                            state,
                            NavStatus::Obstacle,
                            format!(
                                "position feed lost for {} consecutive samples",
                                state.consecutive_misses
                            ),
                        );
                    }
                    // The wall-clock ceiling applies even while blind.
                    if state.start_time.elapsed() >= self.config.timeout() {
                        return Self::outcome(
                            state,
                            NavStatus::TimedOut,
                            format!("no arrival within {:.0}s", self.config.timeout_secs),
                        );
                    }
                    std::thread::sleep(self.config.sample_interval());
                    continue;
                }
            };

            state.current_position = Some(position.clone());
            let distance = position.distance(&state.target);

            // Arrival has the highest precedence and is evaluated before
            // any command, so an in-radius start arrives without a single
            // hold.
            let in_safe_zone = state
                .safe_zone
                .as_ref()
                .is_some_and(|zone| zone.contains(&position));
            if distance <= state.arrival_radius || in_safe_zone {
                return Self::outcome(state, NavStatus::Arrived, "arrived".to_string());
            }

            // Heading: raw bearing, exponentially blended, then quantized
            // and damped against the previous committed direction.
            let raw_heading = position.bearing_to(&state.target);
            state.heading = if state.filter.committed().is_none() {
                raw_heading
            } else {
                (state.heading
                    + self.config.smoothing_weight * normalize_degrees(raw_heading - state.heading))
                    .rem_euclid(360.0)
            };
            let proposed = Direction::from_degrees(state.heading);
            let committed = state.filter.observe(position.clone(), proposed);

            if let Err(e) = self.actuator.hold(committed) {
                return Self::outcome(state, NavStatus::Failed, format!("actuator fault: {}", e));
            }

            // Timeout is an absolute ceiling: checked before stuck so a
            // simultaneous trigger resolves to TimedOut.
            if state.start_time.elapsed() >= self.config.timeout() {
                return Self::outcome(
                    state,
                    NavStatus::TimedOut,
                    format!("no arrival within {:.0}s", self.config.timeout_secs),
                );
            }

            if Self::made_progress(state, distance) {
                state.last_progress_time = Instant::now();
            } else if state.last_progress_time.elapsed() >= self.config.stuck_timeout() {
                state.attempts += 1;
                if state.attempts < self.config.max_attempts {
                    self.begin_retry(state, committed);
                } else {
                    return Self::outcome(
                        state,
                        NavStatus::Failed,
                        format!(
                            "stuck_exhausted: no progress toward target after {} attempts",
                            state.attempts
                        ),
                    );
                }
            }

            self.shared.publish(StatusView::of(state, NavStatus::Moving));
            self.log_record(state, NavStatus::Moving, None);

            if last_status_log.elapsed() >= STATUS_LOG_INTERVAL {
                tracing::info!(
                    "navigating: pos={}, dist={:.1}, dir={}, attempts={}",
                    position,
                    distance,
                    committed,
                    state.attempts
                );
                last_status_log = Instant::now();
            }

            std::thread::sleep(self.config.sample_interval());
        }
    }

    /// Track the best distance seen since the last retry; any reduction
    /// beyond jitter counts as progress.
    fn made_progress(state: &mut NavigationState, distance: f64) -> bool {
        match state.best_distance {
            None => {
                state.best_distance = Some(distance);
                true
            }
            Some(best) if distance < best - PROGRESS_EPSILON => {
                state.best_distance = Some(distance);
                true
            }
            Some(_) => false,
        }
    }

    /// Reset progress tracking for a stuck retry, optionally nudging one
    /// adjacent direction for a tick to probe around the obstruction.
    fn begin_retry(&mut self, state: &mut NavigationState, committed: Direction) {
        tracing::warn!(
            "stuck: no progress for {:.1}s, retry {}/{}",
            self.config.stuck_timeout_secs,
            state.attempts,
            self.config.max_attempts
        );
        self.log_record(state, NavStatus::Moving, Some("stuck, retrying"));

        state.last_progress_time = Instant::now();
        state.best_distance = None;
        state.filter.reset();

        if self.config.nudge_on_retry
            && let Some((clockwise, counter_clockwise)) = committed.adjacent()
        {
            // Alternate the nudge side across attempts to probe both ways
            // around whatever is blocking.
            let nudge = if state.attempts % 2 == 1 {
                clockwise
            } else {
                counter_clockwise
            };
            tracing::debug!("nudging {} before retry", nudge);
            if let Err(e) = self.actuator.hold(nudge) {
                // A persistent fault fails the next regular hold.
                tracing::warn!("nudge command failed: {}", e);
            }
        }
    }

    fn outcome(state: &NavigationState, status: NavStatus, reason: String) -> NavOutcome {
        NavOutcome {
            status,
            reason,
            distance_remaining: state.distance_remaining(),
            attempts: state.attempts,
            elapsed: state.start_time.elapsed(),
        }
    }

    fn log_record(&mut self, state: &NavigationState, status: NavStatus, note: Option<&str>) {
        self.log.record(&ProgressRecord {
            timestamp_ms: now_ms(),
            status,
            current_position: state.current_position.clone(),
            target_position: state.target.clone(),
            distance_remaining: state.distance_remaining(),
            heading_degrees: state.heading,
            attempts: state.attempts,
            note: note.map(str::to_string),
        });
    }
}
